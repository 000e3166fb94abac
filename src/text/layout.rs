use crate::foundation::core::Point;
use crate::scene::display::FontSpec;
use crate::text::typeset::Typesetter;

/// Greedy word wrap measured with `ts`. Explicit newlines always break.
pub fn wrap_words(
    text: &str,
    max_width: f64,
    font: FontSpec,
    ts: &mut dyn Typesetter,
) -> Vec<String> {
    let mut lines = Vec::new();
    for para in text.split('\n') {
        let mut line = String::new();
        for word in para.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_owned()
            } else {
                format!("{line} {word}")
            };
            if !line.is_empty() && ts.measure(&candidate, font) > max_width {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
            } else {
                line = candidate;
            }
        }
        lines.push(line);
    }
    lines
}

/// Where a laid out glyph's point sits relative to its cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlyphAnchor {
    /// Top-left of the cell.
    #[default]
    TopLeft,
    /// Centre of the cell, for centred/middle text.
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowOptions {
    pub left: f64,
    pub max_width: f64,
    pub top: f64,
    pub line_height: f64,
    /// Extra advance after each glyph.
    pub char_gap: f64,
    /// Vertical advance of a blank line.
    pub paragraph_gap: f64,
    /// Stop laying out once a new line would start below this y.
    pub bottom: Option<f64>,
    pub anchor: GlyphAnchor,
}

impl FlowOptions {
    /// Paragraph block with a side margin of `max(min_margin, width * margin_frac)`.
    pub fn margins(
        width: f64,
        height: f64,
        min_margin: f64,
        margin_frac: f64,
        top_frac: f64,
        line_height: f64,
    ) -> Self {
        let margin = min_margin.max(width * margin_frac);
        Self {
            left: margin,
            max_width: (width - margin * 2.0).max(1.0),
            top: height * top_frac,
            line_height,
            char_gap: 0.0,
            paragraph_gap: line_height,
            bottom: None,
            anchor: GlyphAnchor::TopLeft,
        }
    }

    pub fn centered(self) -> Self {
        Self {
            anchor: GlyphAnchor::Center,
            ..self
        }
    }

    pub fn char_gap(self, gap: f64) -> Self {
        Self {
            char_gap: gap,
            ..self
        }
    }

    pub fn paragraph_gap(self, gap: f64) -> Self {
        Self {
            paragraph_gap: gap,
            ..self
        }
    }

    pub fn bottom(self, y: f64) -> Self {
        Self {
            bottom: Some(y),
            ..self
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlowGlyph {
    pub ch: char,
    pub pos: Point,
    pub width: f64,
    /// Index of the word this glyph belongs to.
    pub word: usize,
    pub line: usize,
}

/// Lays a paragraph out glyph by glyph, wrapping whole words.
pub fn flow_layout(
    text: &str,
    font: FontSpec,
    opts: FlowOptions,
    ts: &mut dyn Typesetter,
) -> Vec<FlowGlyph> {
    let space = ts.measure(" ", font);
    let mut out = Vec::new();
    let mut x = opts.left;
    let mut y = opts.top;
    let mut line = 0usize;
    let mut word_index = 0usize;
    let right = opts.left + opts.max_width;
    let mut buf = [0u8; 4];

    let newline = |x: &mut f64, y: &mut f64, line: &mut usize, advance: f64| {
        *x = opts.left;
        *y += advance;
        *line += 1;
    };

    'outer: for (li, raw_line) in text.split('\n').enumerate() {
        if li > 0 {
            let advance = if raw_line.trim().is_empty() {
                opts.paragraph_gap
            } else {
                opts.line_height
            };
            newline(&mut x, &mut y, &mut line, advance);
            if opts.bottom.is_some_and(|b| y > b) {
                break;
            }
        }
        for word in raw_line.split(' ').filter(|w| !w.is_empty()) {
            let word_width = ts.measure(&format!("{word} "), font);
            if x + word_width > right && x > opts.left {
                newline(&mut x, &mut y, &mut line, opts.line_height);
                if opts.bottom.is_some_and(|b| y > b) {
                    break 'outer;
                }
            }
            for ch in word.chars() {
                let cw = ts.measure(ch.encode_utf8(&mut buf), font);
                let pos = match opts.anchor {
                    GlyphAnchor::TopLeft => Point::new(x, y),
                    GlyphAnchor::Center => Point::new(x + cw * 0.5, y + opts.line_height * 0.5),
                };
                out.push(FlowGlyph {
                    ch,
                    pos,
                    width: cw,
                    word: word_index,
                    line,
                });
                x += cw + opts.char_gap;
            }
            x += space;
            word_index += 1;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
