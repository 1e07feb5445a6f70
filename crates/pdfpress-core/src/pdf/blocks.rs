//! Turning renderer output into analyzer blocks.
//!
//! Renderers report text as short same-line segments. The analyzer wants
//! paragraph-sized blocks, so segments are first joined into lines and lines
//! are then stacked into blocks. Images drawn through form XObjects are
//! lifted out of the form into page space. Coordinates are PDF user space
//! (y grows up).

use crate::models::Rect;

/// Minimum vertical overlap, relative to the smaller height, for two segments
/// to share a line.
const SAME_LINE_OVERLAP: f32 = 0.5;

/// Largest horizontal gap between segments of one line, in line heights.
const WORD_GAP: f32 = 1.5;

/// Largest vertical gap between lines of one block, in line heights.
const LINE_GAP: f32 = 0.6;

/// Merge text segment rectangles into paragraph blocks in reading order.
pub fn merge_text_segments(segments: Vec<Rect>) -> Vec<Rect> {
    let mut segments: Vec<Rect> = segments
        .into_iter()
        .filter(|r| r.width() > 0.0 && r.height() > 0.0)
        .collect();

    sort_reading_order(&mut segments);

    let lines = group(segments, joins_line);
    group(lines, joins_block)
}

/// Top to bottom, then left to right.
fn sort_reading_order(rects: &mut [Rect]) {
    rects.sort_by(|a, b| {
        b.y1.partial_cmp(&a.y1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal))
    });
}

/// Fold each rect into the most recent group it joins, or start a new group.
fn group(rects: Vec<Rect>, joins: fn(&Rect, &Rect) -> bool) -> Vec<Rect> {
    let mut groups: Vec<Rect> = Vec::new();

    for rect in rects {
        match groups.iter_mut().rev().find(|g| joins(g, &rect)) {
            Some(existing) => *existing = existing.union(&rect),
            None => groups.push(rect),
        }
    }

    groups
}

fn joins_line(line: &Rect, segment: &Rect) -> bool {
    let min_height = line.height().min(segment.height());
    if line.vertical_overlap(segment) < min_height * SAME_LINE_OVERLAP {
        return false;
    }

    let gap = if segment.x0 >= line.x1 {
        segment.x0 - line.x1
    } else if line.x0 >= segment.x1 {
        line.x0 - segment.x1
    } else {
        0.0
    };
    gap <= segment.height().max(line.height()) * WORD_GAP
}

fn joins_block(block: &Rect, line: &Rect) -> bool {
    if block.horizontal_overlap(line) <= 0.0 {
        return false;
    }
    // Lines arrive top-down, so the new line sits below the block.
    let gap = block.y0 - line.y1;
    gap <= line.height() * LINE_GAP
}

/// An object drawn inside a form XObject, bounded in its parent's space.
#[derive(Debug, Clone, PartialEq)]
pub enum FormChild {
    Image(Rect),
    Form { bounds: Rect, children: Vec<FormChild> },
    Other(Rect),
}

impl FormChild {
    fn bounds(&self) -> &Rect {
        match self {
            FormChild::Image(bounds) | FormChild::Other(bounds) => bounds,
            FormChild::Form { bounds, .. } => bounds,
        }
    }
}

/// Images drawn by a form placed at `placed` on the page, in page space.
///
/// The children's combined extent is taken to cover `placed`, which holds
/// for forms placed by scaling and translation.
pub fn form_images(children: &[FormChild], placed: &Rect) -> Vec<Rect> {
    let Some(extent) = children
        .iter()
        .map(FormChild::bounds)
        .copied()
        .reduce(|a, b| a.union(&b))
    else {
        return Vec::new();
    };

    let mut images = Vec::new();
    for child in children {
        match child {
            FormChild::Image(bounds) => images.extend(bounds.map_between(&extent, placed)),
            FormChild::Form { bounds, children } => {
                if let Some(inner) = bounds.map_between(&extent, placed) {
                    images.extend(form_images(children, &inner));
                }
            }
            FormChild::Other(_) => {}
        }
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // A 10pt-high segment whose top edge is at `top`.
    fn seg(x0: f32, x1: f32, top: f32) -> Rect {
        Rect::new(x0, top - 10.0, x1, top)
    }

    #[test]
    fn test_words_on_a_line_merge() {
        let blocks = merge_text_segments(vec![seg(120.0, 200.0, 700.0), seg(50.0, 110.0, 700.0)]);
        assert_eq!(blocks, vec![Rect::new(50.0, 690.0, 200.0, 700.0)]);
    }

    #[test]
    fn test_paragraph_lines_merge() {
        let blocks = merge_text_segments(vec![
            seg(50.0, 500.0, 700.0),
            seg(50.0, 480.0, 688.0),
            seg(50.0, 300.0, 676.0),
        ]);
        assert_eq!(blocks, vec![Rect::new(50.0, 666.0, 500.0, 700.0)]);
    }

    #[test]
    fn test_distant_paragraphs_stay_apart() {
        let blocks = merge_text_segments(vec![
            seg(50.0, 500.0, 700.0),
            seg(50.0, 500.0, 688.0),
            seg(50.0, 500.0, 600.0),
        ]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], Rect::new(50.0, 678.0, 500.0, 700.0));
        assert_eq!(blocks[1], Rect::new(50.0, 590.0, 500.0, 600.0));
    }

    #[test]
    fn test_columns_stay_apart() {
        let blocks = merge_text_segments(vec![
            seg(50.0, 250.0, 700.0),
            seg(350.0, 550.0, 700.0),
            seg(50.0, 250.0, 688.0),
            seg(350.0, 550.0, 688.0),
        ]);
        assert_eq!(
            blocks,
            vec![
                Rect::new(50.0, 678.0, 250.0, 700.0),
                Rect::new(350.0, 678.0, 550.0, 700.0),
            ]
        );
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        let blocks = merge_text_segments(vec![Rect::new(10.0, 10.0, 10.0, 20.0)]);
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_form_images_map_to_page_space() {
        let children = vec![
            FormChild::Image(Rect::new(0.0, 50.0, 100.0, 100.0)),
            FormChild::Other(Rect::new(0.0, 0.0, 100.0, 40.0)),
        ];
        let images = form_images(&children, &Rect::new(100.0, 100.0, 300.0, 300.0));
        assert_eq!(images, vec![Rect::new(100.0, 200.0, 300.0, 300.0)]);
    }

    #[test]
    fn test_nested_form_images() {
        let children = vec![
            FormChild::Other(Rect::new(0.0, 0.0, 10.0, 10.0)),
            FormChild::Form {
                bounds: Rect::new(0.0, 0.0, 10.0, 5.0),
                children: vec![FormChild::Image(Rect::new(0.0, 0.0, 2.0, 2.0))],
            },
        ];
        let images = form_images(&children, &Rect::from_size(100.0, 100.0));
        assert_eq!(images, vec![Rect::from_size(100.0, 50.0)]);
    }

    #[test]
    fn test_form_without_images() {
        assert!(form_images(&[], &Rect::from_size(10.0, 10.0)).is_empty());
        let children = vec![FormChild::Other(Rect::from_size(5.0, 5.0))];
        assert!(form_images(&children, &Rect::from_size(10.0, 10.0)).is_empty());
    }
}
