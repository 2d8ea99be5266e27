use palette::Hsla;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::color::Color as AppColor;
use crate::params::TransformParams;
use crate::store::Palette;

/// Rows of the parameter column, top to bottom.
pub const PARAM_ROWS: usize = 5;

/// A column of colour swatches, one per palette entry, each followed by its
/// hex value. Highlights the selected entry.
pub struct PaletteWidget<'a> {
    palette: &'a Palette,
    title: &'a str,
    selected: Option<usize>,
    focused: bool,
}

impl<'a> PaletteWidget<'a> {
    pub fn new(palette: &'a Palette, title: &'a str) -> Self {
        Self {
            palette,
            title,
            selected: None,
            focused: false,
        }
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

pub fn to_color(c: &AppColor) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Choose black or white foreground for readable text on the given background.
pub fn contrast_fg(c: &AppColor) -> Color {
    if c.relative_luminance() > 0.4 {
        Color::Black
    } else {
        Color::White
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Build one swatch line: a coloured block labelled with the 1-based index,
/// then the stored value. The selected entry gets bold + underline.
fn build_swatch_line(index: usize, value: &str, is_selected: bool) -> Line<'static> {
    let label = format!("{:^6}", index + 1);
    let swatch = match AppColor::from_hex(value) {
        Ok(c) => Span::styled(label, Style::default().bg(to_color(&c)).fg(contrast_fg(&c))),
        Err(_) => Span::styled(format!("{:^6}", "??"), Style::default().fg(Color::Red)),
    };

    let mut text_style = Style::default();
    if is_selected {
        text_style = text_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    let marker = if is_selected { "> " } else { "  " };

    Line::from(vec![
        Span::raw(marker),
        swatch,
        Span::raw(" "),
        Span::styled(value.to_string(), text_style),
    ])
}

impl Widget for PaletteWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(format!(" {} ({}) ", self.title, self.palette.len()))
            .border_style(border_style(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.palette.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "  (empty)",
                Style::default().fg(Color::DarkGray),
            )))
            .render(inner, buf);
            return;
        }

        let lines: Vec<Line> = self
            .palette
            .iter()
            .enumerate()
            .map(|(i, entry)| build_swatch_line(i, &entry.value, self.selected == Some(i)))
            .collect();

        // keep the selection on screen
        let height = inner.height.max(1) as usize;
        let offset = self
            .selected
            .map_or(0, |s| s.saturating_sub(height - 1));

        Paragraph::new(lines)
            .scroll((offset as u16, 0))
            .render(inner, buf);
    }
}

/// The parameter column.
pub struct ParamsWidget<'a> {
    params: &'a TransformParams,
    cursor: Option<usize>,
}

impl<'a> ParamsWidget<'a> {
    pub fn new(params: &'a TransformParams, cursor: Option<usize>) -> Self {
        Self { params, cursor }
    }
}

fn checkbox(on: bool) -> &'static str {
    if on {
        "[x]"
    } else {
        "[ ]"
    }
}

impl Widget for ParamsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Transform ")
            .border_style(border_style(self.cursor.is_some()));
        let inner = block.inner(area);
        block.render(area, buf);

        let p = self.params;
        let rows: [(&str, String); PARAM_ROWS] = [
            ("Brightness", format!("{:+}", p.brightness())),
            ("Invert", checkbox(p.invert_enabled()).to_string()),
            ("Midpoint", format!("{:.0}%", p.invert_midpoint())),
            ("Hue shift", checkbox(p.hue_shift_enabled()).to_string()),
            ("Target hue", format!("{:.0}°", p.hue_shift_target())),
        ];

        let mut lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .map(|(i, (name, value))| {
                let style = if self.cursor == Some(i) {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!(" {name:<11}"), style),
                    Span::styled(format!("{value:>5}"), style),
                ])
            })
            .collect();

        let target: Hsla = Hsla::new(p.hue_shift_target(), 1.0, 0.5, 1.0);
        let target = AppColor::from_hsl(target);
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw(" "),
            Span::styled("      ", Style::default().bg(to_color(&target))),
            Span::styled(" target", Style::default().fg(Color::DarkGray)),
        ]));

        Paragraph::new(lines).render(inner, buf);
    }
}

/// A rectangle of `percent_x` by `percent_y` centred in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);
    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical[1])[1]
}
