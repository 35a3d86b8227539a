// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Free-text keyboard layout parsing.

/// Parse a layout spec into a grid of button labels.
///
/// Line breaks separate rows, commas separate cells. Cells are trimmed;
/// empty cells and empty rows are dropped.
pub fn parse_layout(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(|line| {
            line.split(',')
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect()
}
