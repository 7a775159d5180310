//! Brain screen interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Fonts available on the brain screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Font {
    MonoMedium,
    MonoExtraLarge
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// The brain's touch screen.
pub trait BrainScreen {
    /// Clear the whole screen.
    fn clear(&mut self);

    /// Print the text at the given row and column, 1-based.
    fn print_at(&mut self, row: u8, col: u8, text: &str);

    /// Set the font used by subsequent prints.
    fn set_font(&mut self, font: Font);

    /// Whether the screen is currently being touched.
    fn pressing(&self) -> bool;
}
