use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Affine, Vec2};
use crate::foundation::error::{KinetypeError, KinetypeResult};
use crate::scene::display::{FontFamily, FontSpec, TextOp};
use crate::text::typeset::{
    BlockTypesetter, LineMetrics, PlacedGlyphs, PlacedText, Typesetter, anchor_offset,
};

/// Environment variable naming an extra font directory.
pub const FONT_DIR_ENV: &str = "KINETYPE_FONT_DIR";

/// Runs are shaped once at this size and scaled when placed.
const REF_SIZE: f32 = 64.0;

const SYNTHETIC_ITALIC_SKEW: f64 = -0.2;

/// Where to look for font files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontSources {
    pub dir: Option<PathBuf>,
    pub serif: Option<PathBuf>,
    pub sans: Option<PathBuf>,
    pub mono: Option<PathBuf>,
    /// Also scan the usual system font directories.
    pub system_dirs: bool,
}

impl Default for FontSources {
    fn default() -> Self {
        Self {
            dir: None,
            serif: None,
            sans: None,
            mono: None,
            system_dirs: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceKey {
    pub family: FontFamily,
    pub bold: bool,
    pub italic: bool,
}

impl FaceKey {
    pub const fn regular(family: FontFamily) -> Self {
        Self {
            family,
            bold: false,
            italic: false,
        }
    }
}

const SERIF: &[&str] = &[
    "DejaVuSerif.ttf",
    "LiberationSerif-Regular.ttf",
    "NotoSerif-Regular.ttf",
    "Times New Roman.ttf",
    "times.ttf",
    "Georgia.ttf",
];
const SERIF_BOLD: &[&str] = &[
    "DejaVuSerif-Bold.ttf",
    "LiberationSerif-Bold.ttf",
    "NotoSerif-Bold.ttf",
    "Times New Roman Bold.ttf",
    "timesbd.ttf",
];
const SERIF_ITALIC: &[&str] = &[
    "DejaVuSerif-Italic.ttf",
    "LiberationSerif-Italic.ttf",
    "NotoSerif-Italic.ttf",
    "Times New Roman Italic.ttf",
    "timesi.ttf",
];
const SANS: &[&str] = &[
    "DejaVuSans.ttf",
    "LiberationSans-Regular.ttf",
    "NotoSans-Regular.ttf",
    "Arial.ttf",
    "arial.ttf",
];
const SANS_BOLD: &[&str] = &[
    "DejaVuSans-Bold.ttf",
    "LiberationSans-Bold.ttf",
    "NotoSans-Bold.ttf",
    "Arial Bold.ttf",
    "arialbd.ttf",
];
const SANS_ITALIC: &[&str] = &[
    "DejaVuSans-Oblique.ttf",
    "LiberationSans-Italic.ttf",
    "NotoSans-Italic.ttf",
    "Arial Italic.ttf",
    "ariali.ttf",
];
const MONO: &[&str] = &[
    "DejaVuSansMono.ttf",
    "LiberationMono-Regular.ttf",
    "NotoSansMono-Regular.ttf",
    "Courier New.ttf",
    "cour.ttf",
];
const MONO_BOLD: &[&str] = &[
    "DejaVuSansMono-Bold.ttf",
    "LiberationMono-Bold.ttf",
    "NotoSansMono-Bold.ttf",
    "Courier New Bold.ttf",
    "courbd.ttf",
];

fn candidates(key: FaceKey) -> &'static [&'static str] {
    match (key.family, key.bold, key.italic) {
        (FontFamily::Serif, false, false) => SERIF,
        (FontFamily::Serif, true, false) => SERIF_BOLD,
        (FontFamily::Serif, false, true) => SERIF_ITALIC,
        (FontFamily::Sans, false, false) => SANS,
        (FontFamily::Sans, true, false) => SANS_BOLD,
        (FontFamily::Sans, false, true) => SANS_ITALIC,
        (FontFamily::Mono, false, false) => MONO,
        (FontFamily::Mono, true, false) => MONO_BOLD,
        _ => &[],
    }
}

const FACE_KEYS: [FaceKey; 8] = [
    FaceKey::regular(FontFamily::Serif),
    FaceKey {
        family: FontFamily::Serif,
        bold: true,
        italic: false,
    },
    FaceKey {
        family: FontFamily::Serif,
        bold: false,
        italic: true,
    },
    FaceKey::regular(FontFamily::Sans),
    FaceKey {
        family: FontFamily::Sans,
        bold: true,
        italic: false,
    },
    FaceKey {
        family: FontFamily::Sans,
        bold: false,
        italic: true,
    },
    FaceKey::regular(FontFamily::Mono),
    FaceKey {
        family: FontFamily::Mono,
        bold: true,
        italic: false,
    },
];

fn search_dirs(sources: &FontSources) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(d) = &sources.dir {
        dirs.push(d.clone());
    }
    if let Some(d) = std::env::var_os(FONT_DIR_ENV) {
        dirs.push(PathBuf::from(d));
    }
    if sources.system_dirs {
        dirs.extend(
            [
                "/usr/share/fonts",
                "/usr/local/share/fonts",
                "/Library/Fonts",
                "/System/Library/Fonts/Supplemental",
                "C:\\Windows\\Fonts",
            ]
            .into_iter()
            .map(PathBuf::from),
        );
        if let Some(home) = std::env::var_os("HOME") {
            let home = PathBuf::from(home);
            dirs.push(home.join(".local/share/fonts"));
            dirs.push(home.join(".fonts"));
        }
    }
    dirs
}

/// File name to path, first directory wins.
fn index_fonts(dirs: &[PathBuf]) -> HashMap<String, PathBuf> {
    fn walk(dir: &Path, depth: u32, out: &mut HashMap<String, PathBuf>) {
        if depth > 5 {
            return;
        }
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        let mut entries: Vec<_> = entries.filter_map(Result::ok).map(|e| e.path()).collect();
        entries.sort();
        for p in entries {
            if p.is_dir() {
                walk(&p, depth + 1, out);
            } else if let Some(name) = p.file_name().and_then(|n| n.to_str()) {
                out.entry(name.to_owned()).or_insert_with(|| p.clone());
            }
        }
    }
    let mut out = HashMap::new();
    for d in dirs {
        walk(d, 0, &mut out);
    }
    out
}

struct Face {
    data: vello_cpu::peniko::FontData,
    family_name: String,
    bold: bool,
    italic: bool,
}

#[derive(Debug)]
struct ShapedRun {
    glyphs: Vec<vello_cpu::Glyph>,
    advance: f64,
    metrics: LineMetrics,
}

/// Font faces registered with parley plus a cache of shaped runs.
///
/// With no faces loaded every call falls back to [`BlockTypesetter`].
pub struct FontBook {
    faces: HashMap<FaceKey, Face>,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    runs: HashMap<(FaceKey, String), Arc<ShapedRun>>,
    fallback: BlockTypesetter,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::empty()
    }
}

impl FontBook {
    pub fn empty() -> Self {
        Self {
            faces: HashMap::new(),
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            runs: HashMap::new(),
            fallback: BlockTypesetter,
        }
    }

    /// Load explicit files first, then discover the rest by well-known file names.
    #[tracing::instrument(skip(sources))]
    pub fn load(sources: &FontSources) -> KinetypeResult<Self> {
        let mut book = Self::empty();
        for (family, path) in [
            (FontFamily::Serif, &sources.serif),
            (FontFamily::Sans, &sources.sans),
            (FontFamily::Mono, &sources.mono),
        ] {
            if let Some(path) = path {
                let bytes = std::fs::read(path).map_err(|e| {
                    KinetypeError::validation(format!(
                        "failed to read font '{}': {e}",
                        path.display()
                    ))
                })?;
                book.add_face(FaceKey::regular(family), bytes)?;
            }
        }

        let index = index_fonts(&search_dirs(sources));
        for key in FACE_KEYS {
            if book.faces.contains_key(&key) {
                continue;
            }
            // An explicit regular file pins the family; don't mix in discovered styles.
            if (key.bold || key.italic) && book.explicit(sources, key.family) {
                continue;
            }
            let Some(path) = candidates(key).iter().find_map(|n| index.get(*n)) else {
                continue;
            };
            match std::fs::read(path) {
                Ok(bytes) => {
                    if let Err(e) = book.add_face(key, bytes) {
                        tracing::warn!(path = %path.display(), error = %e, "skipping font");
                    } else {
                        tracing::debug!(path = %path.display(), ?key, "font face");
                    }
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "unreadable font"),
            }
        }

        if book.faces.is_empty() {
            tracing::warn!("no font files found; text is drawn as blocks");
        } else {
            tracing::info!(faces = book.faces.len(), "fonts loaded");
        }
        Ok(book)
    }

    fn explicit(&self, sources: &FontSources, family: FontFamily) -> bool {
        match family {
            FontFamily::Serif => sources.serif.is_some(),
            FontFamily::Sans => sources.sans.is_some(),
            FontFamily::Mono => sources.mono.is_some(),
        }
    }

    pub fn add_face(&mut self, key: FaceKey, bytes: Vec<u8>) -> KinetypeResult<()> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            KinetypeError::validation("no font families registered from font bytes")
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| KinetypeError::validation("registered font family has no name"))?
            .to_string();
        let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        self.faces.insert(
            key,
            Face {
                data,
                family_name,
                bold: key.bold,
                italic: key.italic,
            },
        );
        self.runs.retain(|(k, _), _| *k != key);
        Ok(())
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Best loaded face for `font`: exact style, then regular, then any family.
    fn resolve(&self, font: FontSpec) -> Option<FaceKey> {
        let want = FaceKey {
            family: font.family,
            bold: font.bold,
            italic: font.italic,
        };
        let tries = [
            want,
            FaceKey {
                italic: false,
                ..want
            },
            FaceKey {
                bold: false,
                ..want
            },
            FaceKey::regular(font.family),
            FaceKey::regular(FontFamily::Sans),
            FaceKey::regular(FontFamily::Serif),
            FaceKey::regular(FontFamily::Mono),
        ];
        tries.into_iter().find(|k| self.faces.contains_key(k))
    }

    fn shape(&mut self, key: FaceKey, text: &str) -> Option<Arc<ShapedRun>> {
        let cache_key = (key, text.to_owned());
        if let Some(run) = self.runs.get(&cache_key) {
            return Some(run.clone());
        }
        let face = self.faces.get(&key)?;
        let family_name = face.family_name.clone();
        let (bold, italic) = (face.bold, face.italic);

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(REF_SIZE));
        if bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        if italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        let mut advance = 0.0;
        let mut metrics = LineMetrics {
            ascent: f64::from(REF_SIZE) * 0.8,
            descent: f64::from(REF_SIZE) * 0.2,
        };
        if let Some(line) = layout.lines().next() {
            let m = line.metrics();
            let baseline = m.baseline;
            advance = f64::from(m.advance);
            metrics = LineMetrics {
                ascent: f64::from(m.ascent),
                descent: f64::from(m.descent),
            };
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y - baseline,
                }));
            }
        }

        let run = Arc::new(ShapedRun {
            glyphs,
            advance,
            metrics,
        });
        self.runs.insert(cache_key, run.clone());
        Some(run)
    }
}

impl Typesetter for FontBook {
    fn measure(&mut self, text: &str, font: FontSpec) -> f64 {
        let Some(key) = self.resolve(font) else {
            return self.fallback.measure(text, font);
        };
        match self.shape(key, text) {
            Some(run) => run.advance * font.size / f64::from(REF_SIZE),
            None => self.fallback.measure(text, font),
        }
    }

    fn metrics(&mut self, font: FontSpec) -> LineMetrics {
        let Some(key) = self.resolve(font) else {
            return self.fallback.metrics(font);
        };
        match self.shape(key, "Hg") {
            Some(run) => {
                let k = font.size / f64::from(REF_SIZE);
                LineMetrics {
                    ascent: run.metrics.ascent * k,
                    descent: run.metrics.descent * k,
                }
            }
            None => self.fallback.metrics(font),
        }
    }

    fn place(&mut self, op: &TextOp) -> Option<PlacedText> {
        let Some(key) = self.resolve(op.font) else {
            return self.fallback.place(op);
        };
        let run = self.shape(key, &op.text)?;
        if run.glyphs.is_empty() {
            return None;
        }
        let k = op.font.size / f64::from(REF_SIZE);
        let n = op.text.chars().count() as f64;
        let width = run.advance * k + op.letter_spacing * n;
        let metrics = LineMetrics {
            ascent: run.metrics.ascent * k,
            descent: run.metrics.descent * k,
        };
        let anchor: Vec2 = anchor_offset(op.align, op.baseline, width, metrics);
        let spacing = op.letter_spacing as f32;
        let glyphs = run
            .glyphs
            .iter()
            .enumerate()
            .map(|(i, g)| vello_cpu::Glyph {
                id: g.id,
                x: g.x * k as f32 + spacing * i as f32,
                y: g.y * k as f32,
            })
            .collect();
        let face = self.faces.get(&key)?;
        let mut transform = op.transform * Affine::translate(op.origin.to_vec2() + anchor);
        if op.font.italic && !face.italic {
            transform *= Affine::skew(SYNTHETIC_ITALIC_SKEW, 0.0);
        }
        Some(PlacedText {
            transform,
            glyphs: PlacedGlyphs::Outline {
                font: face.data.clone(),
                size: op.font.size as f32,
                glyphs,
            },
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
