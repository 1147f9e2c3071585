//! Run-level (character) views and setters.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::xml::XmlElement;

/// Schema order of the `w:rPr` children we touch.
pub(crate) const RPR_ORDER: &[&str] = &[
    "w:rStyle",
    "w:rFonts",
    "w:b",
    "w:bCs",
    "w:i",
    "w:iCs",
    "w:caps",
    "w:smallCaps",
    "w:strike",
    "w:dstrike",
    "w:outline",
    "w:shadow",
    "w:emboss",
    "w:imprint",
    "w:noProof",
    "w:snapToGrid",
    "w:vanish",
    "w:webHidden",
    "w:color",
    "w:spacing",
    "w:w",
    "w:kern",
    "w:position",
    "w:sz",
    "w:szCs",
    "w:highlight",
    "w:u",
    "w:effect",
    "w:bdr",
    "w:shd",
    "w:fitText",
    "w:vertAlign",
    "w:rtl",
    "w:cs",
    "w:em",
    "w:lang",
    "w:eastAsianLayout",
    "w:specVanish",
];

/// An RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Black, what Word renders for `auto`.
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Parse `RRGGBB` or `#RRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Upper-case `RRGGBB`, as stored in `w:color`.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

/// Interpret an OOXML on/off property (`<w:b/>`, `<w:b w:val="0"/>`).
pub(crate) fn on_off(element: &XmlElement) -> bool {
    !matches!(
        element.attr("w:val"),
        Some("0") | Some("false") | Some("off") | Some("none")
    )
}

/// Read-only view over a `w:rPr` element (run or style level).
#[derive(Debug, Clone, Copy)]
pub struct RunProperties<'a> {
    element: &'a XmlElement,
}

impl<'a> RunProperties<'a> {
    /// Wrap a `w:rPr` element.
    pub fn new(element: &'a XmlElement) -> Self {
        Self { element }
    }

    /// Character style id.
    pub fn style_id(&self) -> Option<&'a str> {
        self.element.child("w:rStyle").and_then(|e| e.attr("w:val"))
    }

    /// Bold, if set at this level.
    pub fn bold(&self) -> Option<bool> {
        self.element.child("w:b").map(on_off)
    }

    /// Italic, if set at this level.
    pub fn italic(&self) -> Option<bool> {
        self.element.child("w:i").map(on_off)
    }

    /// Underline, if set at this level. Any style other than `none` counts.
    pub fn underline(&self) -> Option<bool> {
        self.element
            .child("w:u")
            .map(|u| !matches!(u.attr("w:val"), Some("none") | Some("0")))
    }

    /// Font size in points (`w:sz` is in half-points).
    pub fn size_points(&self) -> Option<f64> {
        self.element
            .child("w:sz")
            .and_then(|e| e.attr("w:val"))
            .and_then(|v| v.parse::<f64>().ok())
            .map(|half| half / 2.0)
    }

    /// Explicit font color; `auto` reads as `None`.
    pub fn color(&self) -> Option<Rgb> {
        self.element
            .child("w:color")
            .and_then(|e| e.attr("w:val"))
            .and_then(Rgb::from_hex)
    }

    /// East-Asian (CJK) font name.
    pub fn east_asia_font(&self) -> Option<&'a str> {
        self.element
            .child("w:rFonts")
            .and_then(|e| e.attr("w:eastAsia"))
    }

    /// Latin font name (`w:ascii`, falling back to `w:hAnsi`).
    pub fn ascii_font(&self) -> Option<&'a str> {
        let fonts = self.element.child("w:rFonts")?;
        fonts.attr("w:ascii").or_else(|| fonts.attr("w:hAnsi"))
    }
}

/// Read-only view of a `w:r` element.
#[derive(Debug, Clone, Copy)]
pub struct Run<'a> {
    element: &'a XmlElement,
}

impl<'a> Run<'a> {
    /// Wrap a `w:r` element.
    pub fn new(element: &'a XmlElement) -> Self {
        Self { element }
    }

    /// Underlying element.
    pub fn element(&self) -> &'a XmlElement {
        self.element
    }

    /// Direct run properties.
    pub fn properties(&self) -> Option<RunProperties<'a>> {
        self.element.child("w:rPr").map(RunProperties::new)
    }

    /// Visible text of the run.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in self.element.elements() {
            match child.name.as_str() {
                "w:t" => out.push_str(&child.inner_text()),
                "w:tab" => out.push('\t'),
                "w:br" | "w:cr" => out.push('\n'),
                _ => {}
            }
        }
        out
    }

    /// Whether the run carries a comment reference mark.
    pub fn is_comment_reference(&self) -> bool {
        self.element.child("w:commentReference").is_some()
    }
}

/// Mutable view of a `w:r` element with high-level setters.
pub struct RunMut<'a> {
    element: &'a mut XmlElement,
}

impl<'a> RunMut<'a> {
    /// Wrap a `w:r` element.
    pub fn new(element: &'a mut XmlElement) -> Self {
        Self { element }
    }

    fn rpr(&mut self) -> &mut XmlElement {
        self.element.ensure_first_child("w:rPr")
    }

    fn set_on_off(&mut self, name: &str, cs_name: &str, value: bool) {
        let rpr = self.rpr();
        for key in [name, cs_name] {
            let el = rpr.ensure_child(key, RPR_ORDER);
            if value {
                el.remove_attr("w:val");
            } else {
                el.set_attr("w:val", "0");
            }
        }
    }

    /// Set bold on or off (explicitly, so styles cannot override it).
    pub fn set_bold(&mut self, value: bool) {
        self.set_on_off("w:b", "w:bCs", value);
    }

    /// Set italic on or off.
    pub fn set_italic(&mut self, value: bool) {
        self.set_on_off("w:i", "w:iCs", value);
    }

    /// Set single underline or none.
    pub fn set_underline(&mut self, value: bool) {
        let u = self.rpr().ensure_child("w:u", RPR_ORDER);
        u.set_attr("w:val", if value { "single" } else { "none" });
    }

    /// Set the font size in points.
    pub fn set_size_points(&mut self, points: f64) {
        let half = ((points * 2.0).round() as i64).to_string();
        let rpr = self.rpr();
        rpr.ensure_child("w:sz", RPR_ORDER).set_attr("w:val", half.clone());
        rpr.ensure_child("w:szCs", RPR_ORDER).set_attr("w:val", half);
    }

    /// Set the font color.
    pub fn set_color(&mut self, color: Rgb) {
        let el = self.rpr().ensure_child("w:color", RPR_ORDER);
        el.set_attr("w:val", color.to_hex());
        el.remove_attr("w:themeColor");
        el.remove_attr("w:themeShade");
        el.remove_attr("w:themeTint");
    }

    /// Set the East-Asian font.
    pub fn set_east_asia_font(&mut self, name: &str) {
        let fonts = self.rpr().ensure_child("w:rFonts", RPR_ORDER);
        fonts.set_attr("w:eastAsia", name);
        fonts.remove_attr("w:eastAsiaTheme");
    }

    /// Set the Latin font (`w:ascii` and `w:hAnsi`).
    pub fn set_ascii_font(&mut self, name: &str) {
        let fonts = self.rpr().ensure_child("w:rFonts", RPR_ORDER);
        fonts.set_attr("w:ascii", name);
        fonts.set_attr("w:hAnsi", name);
        fonts.remove_attr("w:asciiTheme");
        fonts.remove_attr("w:hAnsiTheme");
    }
}
