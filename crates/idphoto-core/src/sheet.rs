//! Print sheet composition.
//!
//! The sheet is a white canvas with a centered grid of identical-size cells.
//! Each grid row repeats one cropped photo across every column.

use crate::config::PrintLayout;
use crate::decode::DecodedImage;

pub const SHEET_COLOR: [u8; 3] = [255, 255, 255];

/// Decide which photo fills each grid row.
///
/// With two photos the first `ceil(rows / 2)` rows take the first and the
/// rest take the second; with one photo every row uses it. Returns `None`
/// when there is nothing to print.
pub fn assign_rows<'a>(
    rows: u32,
    first: Option<&'a DecodedImage>,
    second: Option<&'a DecodedImage>,
) -> Option<Vec<&'a DecodedImage>> {
    let rows = rows as usize;
    match (first, second) {
        (Some(a), Some(b)) => {
            let split = rows.div_ceil(2);
            Some((0..rows).map(|r| if r < split { a } else { b }).collect())
        }
        (Some(only), None) | (None, Some(only)) => Some(vec![only; rows]),
        (None, None) => None,
    }
}

/// Tile `rows` onto a blank sheet, one photo per grid row.
///
/// Photos are pasted at their cell origin and clipped to the sheet; rows
/// beyond `layout.rows` are ignored.
pub fn compose_sheet(layout: &PrintLayout, rows: &[&DecodedImage]) -> DecodedImage {
    let mut sheet = DecodedImage::filled(layout.sheet_width, layout.sheet_height, SHEET_COLOR);

    for (row, photo) in rows.iter().take(layout.rows as usize).enumerate() {
        for col in 0..layout.columns {
            let (x, y) = layout.cell_origin(row as u32, col);
            sheet.paste(photo, x, y);
        }
    }

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;

    fn layout() -> PrintLayout {
        PrintLayout::from_config(&EditorConfig::default())
    }

    #[test]
    fn test_assign_rows() {
        let a = DecodedImage::filled(2, 2, [1, 1, 1]);
        let b = DecodedImage::filled(2, 2, [2, 2, 2]);

        assert!(assign_rows(2, None, None).is_none());

        let one = assign_rows(2, Some(&a), None).unwrap();
        assert_eq!(one, vec![&a, &a]);
        let other = assign_rows(2, None, Some(&b)).unwrap();
        assert_eq!(other, vec![&b, &b]);

        let both = assign_rows(2, Some(&a), Some(&b)).unwrap();
        assert_eq!(both, vec![&a, &b]);

        let three = assign_rows(3, Some(&a), Some(&b)).unwrap();
        assert_eq!(three, vec![&a, &a, &b]);
    }

    #[test]
    fn test_sheet_size_and_background() {
        let l = layout();
        let sheet = compose_sheet(&l, &[]);
        assert_eq!((sheet.width, sheet.height), (1772, 1181));
        assert!(sheet.pixels.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_cells_are_placed_on_grid() {
        let l = layout();
        let a = DecodedImage::filled(l.photo_width, l.photo_height, [200, 0, 0]);
        let b = DecodedImage::filled(l.photo_width, l.photo_height, [0, 0, 200]);
        let sheet = compose_sheet(&l, &[&a, &b]);

        for col in 0..3 {
            let (x, y) = l.cell_origin(0, col);
            assert_eq!(sheet.pixel(x as u32, y as u32), Some([200, 0, 0]));
            assert_eq!(sheet.pixel(x as u32 + 412, y as u32 + 530), Some([200, 0, 0]));

            let (x, y) = l.cell_origin(1, col);
            assert_eq!(sheet.pixel(x as u32, y as u32), Some([0, 0, 200]));
        }

        // Gap between columns and the margin stay white
        assert_eq!(sheet.pixel(256 + 413 + 5, 100), Some(SHEET_COLOR));
        assert_eq!(sheet.pixel(300, 54 + 531 + 5), Some(SHEET_COLOR));
        assert_eq!(sheet.pixel(255, 100), Some(SHEET_COLOR));
        assert_eq!(sheet.pixel(100, 53), Some(SHEET_COLOR));
    }

    #[test]
    fn test_extra_rows_are_ignored() {
        let l = layout();
        let a = DecodedImage::filled(l.photo_width, l.photo_height, [9, 9, 9]);
        let sheet = compose_sheet(&l, &[&a, &a, &a, &a]);
        assert_eq!((sheet.width, sheet.height), (l.sheet_width, l.sheet_height));
    }
}
