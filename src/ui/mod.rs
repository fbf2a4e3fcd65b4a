//! UI rendering components

pub mod command_line;
pub mod editor;
pub mod generator;
pub mod help;
pub mod landing;
pub mod layout;
pub mod profile;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};

use crate::app::state::{AppState, Screen};
use crate::theme::Palette;

/// Side panel width for the editor and generator
const PANEL_WIDTH: u16 = 44;

/// Main draw function
pub fn draw(frame: &mut Frame, state: &mut AppState) {
    if state.screen == Screen::Landing {
        landing::draw(frame, &state.landing_animation, &Palette::default());
        return;
    }

    // Clone so panels can render while the editor updates its scroll state
    let palette = state.palette().clone();
    let rows = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Min(3),    // body
        Constraint::Length(1), // command line
    ])
    .split(frame.area());

    layout::draw_header(frame, rows[0], state, &palette);

    let body = rows[1];
    let screen = match state.screen {
        Screen::Help => state.return_screen,
        other => other,
    };
    match screen {
        Screen::Editor | Screen::Generator => {
            let (panel, page) = split_panel(body);
            if screen == Screen::Editor {
                editor::draw(frame, panel, state, &palette);
            } else {
                generator::draw(frame, panel, state, &palette);
            }
            profile::draw(frame, page, state, &palette);
        }
        _ => profile::draw(frame, body, state, &palette),
    }

    if state.screen == Screen::Help {
        help::draw(frame, body, &palette);
    }

    command_line::draw(frame, rows[2], &state.command_line, &palette);
}

/// Editing panel on the left, live preview on the right
fn split_panel(area: Rect) -> (Rect, Rect) {
    let width = PANEL_WIDTH.min(area.width / 2);
    let cols = Layout::horizontal([Constraint::Length(width), Constraint::Min(10)]).split(area);
    (cols[0], cols[1])
}
