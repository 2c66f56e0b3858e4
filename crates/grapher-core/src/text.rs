// File: crates/grapher-core/src/text.rs
// Summary: Text measurement seam plus a deterministic approximate measurer and word wrapping.

/// Width/height of a rendered string, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct TextSize {
    pub width: f32,
    pub height: f32,
}

/// Measures text for layout. Real font metrics live in renderer crates.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f32) -> TextSize;

    fn measure_width(&self, text: &str, font_size: f32) -> f32 {
        self.measure(text, font_size).width
    }
}

/// Fixed-advance approximation: every char is `advance × size` wide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApproxTextMeasure {
    pub advance: f32,
    pub line_height: f32,
}

impl Default for ApproxTextMeasure {
    fn default() -> Self { Self { advance: 0.6, line_height: 1.2 } }
}

impl TextMeasure for ApproxTextMeasure {
    fn measure(&self, text: &str, font_size: f32) -> TextSize {
        let lines: Vec<&str> = text.split('\n').collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        TextSize {
            width: longest as f32 * self.advance * font_size,
            height: lines.len() as f32 * self.line_height * font_size,
        }
    }
}

/// Greedy word wrap to lines of at most `n` chars. Words longer than `n` stay whole.
pub fn split_string(s: &str, n: usize) -> Vec<String> {
    let n = n.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in s.split_whitespace() {
        let needed = if current.is_empty() { word.chars().count() } else { current.chars().count() + 1 + word.chars().count() };
        if needed > n && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
