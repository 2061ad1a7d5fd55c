//! SVG flame graph generation from a computed layout.
//!
//! The forward panel is drawn with its root row at the bottom, followed by a
//! one-row gap and the caller panel drawn top-down. Every block becomes a
//! nested `<svg>` so long names are clipped to their rectangle.

use super::layout::{Block, Layout};
use super::palette::{block_color, css_rgb, Rgb};
use crate::utils::config::{DEFAULT_FONT_SIZE, DEFAULT_ROW_HEIGHT, DEFAULT_WIDTH};
use log::info;

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub width: usize,
    pub row_height: usize,
    pub font_size: usize,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Flame Graph".to_string(),
            width: DEFAULT_WIDTH,
            row_height: DEFAULT_ROW_HEIGHT,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_row_height(mut self, row_height: usize) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_font_size(mut self, font_size: usize) -> Self {
        self.font_size = font_size;
        self
    }
}

/// A block mapped to device coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text_x: f64,
    pub text_y: f64,
    pub fill: Rgb,
    pub name: String,
    pub tooltip: String,
}

/// Geometry of one panel
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub rects: Vec<Rect>,

    /// y coordinate just below the panel
    pub bottom: f64,
}

/// Map blocks of one panel onto the canvas
///
/// **Public** - layout mode without SVG templating
///
/// # Arguments
/// * `top` - y coordinate where the panel starts
/// * `invert` - draw level 0 at the top instead of the bottom
pub fn layout_panel(
    blocks: &[Block],
    root_weight: f64,
    config: &FlamegraphConfig,
    top: f64,
    invert: bool,
) -> Panel {
    let Some(max_level) = blocks.iter().map(|b| b.level).max() else {
        return Panel {
            rects: Vec::new(),
            bottom: top,
        };
    };

    let h = config.row_height as f64;
    let height = (max_level + 1) as f64 * h;
    let scale = if root_weight > 0.0 {
        config.width as f64 / root_weight
    } else {
        0.0
    };

    let rects = blocks
        .iter()
        .map(|block| {
            let row = if invert {
                max_level - block.level
            } else {
                block.level
            };

            Rect {
                x: block.x * scale,
                y: top + height - row as f64 * h - h,
                // One unit gap between neighbours, never thinner than one unit
                width: (block.width * scale - 1.0).max(1.0),
                height: h - 1.0,
                text_x: h / 6.0,
                text_y: h / 2.0,
                fill: block_color(block.color, &block.label),
                name: block.name.clone(),
                tooltip: block.tooltip.clone(),
            }
        })
        .collect();

    Panel {
        rects,
        bottom: top + height,
    }
}

/// Map both panels of a layout onto the canvas
///
/// Returns the rectangles of both panels and the total canvas height.
pub fn layout_rects(layout: &Layout, config: &FlamegraphConfig) -> (Vec<Rect>, f64) {
    let forward = layout_panel(&layout.blocks, layout.root_weight, config, 0.0, false);

    // Blank row between the panels
    let caller_top = if forward.rects.is_empty() {
        0.0
    } else {
        forward.bottom + config.row_height as f64
    };

    let callers = layout_panel(&layout.caller_blocks, layout.root_weight, config, caller_top, true);

    let height = if callers.rects.is_empty() {
        forward.bottom
    } else {
        callers.bottom
    };

    let mut rects = forward.rects;
    rects.extend(callers.rects);
    (rects, height)
}

/// Generate an SVG flame graph from a layout
///
/// **Public** - main entry point for layout mode
pub fn generate_flamegraph(layout: &Layout, config: Option<&FlamegraphConfig>) -> String {
    let config = config.cloned().unwrap_or_default();
    info!(
        "Generating flamegraph with {} blocks and {} caller blocks",
        layout.blocks.len(),
        layout.caller_blocks.len()
    );

    let (rects, height) = layout_rects(layout, &config);

    let mut svg_content = String::new();

    svg_content.push_str(r#"<?xml version="1.0" standalone="no"?>"#);
    svg_content.push('\n');
    svg_content.push_str(
        r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">"#,
    );
    svg_content.push('\n');

    // Header
    svg_content.push_str(&format!(
        r#"<svg version="1.1" width="{}" height="{}" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">"#,
        config.width, height
    ));
    svg_content.push('\n');
    svg_content.push_str(&format!("<title>{}</title>\n", escape_xml(&config.title)));

    // Styles
    svg_content.push_str(
        "<style type=\"text/css\">\n    .func_g:hover { stroke:black; stroke-width:0.5; cursor:pointer; }\n</style>\n",
    );

    for rect in &rects {
        render_rect(rect, config.font_size, &mut svg_content);
    }

    svg_content.push_str("</svg>\n");

    info!("Flamegraph generated successfully ({} bytes)", svg_content.len());
    svg_content
}

fn render_rect(rect: &Rect, font_size: usize, out: &mut String) {
    out.push_str(&format!(
        r#"<svg class="func_g" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"><g>"#,
        rect.x, rect.y, rect.width, rect.height
    ));
    out.push_str(&format!("\n    <title>{}</title>\n", escape_xml(&rect.tooltip)));
    out.push_str(&format!(
        r#"    <rect height="100%" width="100%" fill="{}" rx="2" ry="2" />"#,
        css_rgb(rect.fill)
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"    <text alignment-baseline="central" x="{:.2}" y="{:.2}" font-size="{}px" fill="rgb(0,0,0)">{}</text>"#,
        rect.text_x,
        rect.text_y,
        font_size,
        escape_xml(&rect.name)
    ));
    out.push_str("\n</g></svg>\n");
}

/// Escape text for use in XML content and attributes
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
