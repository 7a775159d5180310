//! Menu presentation

use eqpt_if::eqpt::brain::Font;

use super::AutoSel;
use crate::feedback::Feedback;

/// Brain screen row the selected routine is printed on.
const MENU_ROW: u8 = 3;

/// Build the feedback which shows the current selection on the brain screen
/// and the controller.
pub fn menu_feedback(sel: &AutoSel) -> Vec<Feedback> {
    let label = sel.label().to_string();

    vec![
        Feedback::BrainClear,
        Feedback::BrainFont(Font::MonoExtraLarge),
        Feedback::BrainPrint {
            row: MENU_ROW,
            col: 1,
            text: label.clone()
        },
        Feedback::ControllerPrint(label)
    ]
}
