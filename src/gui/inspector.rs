use crate::model::CelestialBody;

/// The info panel. Knows whether it's showing, and how to lay out a body's details;
/// which body is selected lives in the orrery.
#[derive(Debug, Default)]
pub struct Inspector {
    visible: bool,
}

impl Inspector {
    pub fn new() -> Self {
        Inspector { visible: false }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Hides the panel without touching the selection.
    pub fn collapse(&mut self) {
        self.visible = false;
    }

    pub fn toggle(&mut self, has_selection: bool) {
        self.visible = !self.visible && has_selection;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Panel text for a body. Fields always come out in the same order, with
    /// missing ones shown as "N/A".
    pub fn text(body: &CelestialBody) -> String {
        let mut text = format!("{}\n{}\n", body.name, wrap(&body.fields.info, 48));
        for (label, value) in body.fields.labelled().iter() {
            text.push_str(&format!("\n{}: {}", label, value));
        }
        text
    }
}

// Greedy word wrap; kiss3d text doesn't wrap on its own
fn wrap(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = vec![];
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines.join("\n")
}
