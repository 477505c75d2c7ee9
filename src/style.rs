//! Presentational output of a scroll section.
//!
//! None of this affects the scroll mapping. Styles are produced as ordered
//! property maps the host applies to the section and its sticky container.

use std::collections::BTreeMap;

/// Property name to value, e.g. `"height" -> "2400px"`.
pub type StyleMap = BTreeMap<String, String>;

/// Horizontal placement of the animation inside the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Main axis alignment for the section's flex row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MainAxisAlignment {
    #[default]
    Start,
    Center,
    End,
}

impl MainAxisAlignment {
    pub fn as_css(&self) -> &'static str {
        match self {
            MainAxisAlignment::Start => "flex-start",
            MainAxisAlignment::Center => "center",
            MainAxisAlignment::End => "flex-end",
        }
    }
}

impl From<HorizontalAlignment> for MainAxisAlignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => MainAxisAlignment::Start,
            HorizontalAlignment::Center => MainAxisAlignment::Center,
            HorizontalAlignment::Right => MainAxisAlignment::End,
        }
    }
}

const SECTION_OUTLINE: &str = "1px solid red";
const CONTAINER_OUTLINE: &str = "1px solid blue";

fn set(map: &mut StyleMap, key: &str, value: impl Into<String>) {
    map.insert(key.to_string(), value.into());
}

/// Style of the section element.
///
/// User overrides apply on top of the default width; layout-critical
/// properties are applied last and cannot be overridden.
pub fn section_style(
    user: &StyleMap,
    logical_height: f32,
    alignment: HorizontalAlignment,
    debug: bool,
) -> StyleMap {
    let mut style = StyleMap::new();
    set(&mut style, "width", "100%");
    style.extend(user.iter().map(|(k, v)| (k.clone(), v.clone())));

    if debug {
        set(&mut style, "border", SECTION_OUTLINE);
    }
    set(&mut style, "display", "flex");
    set(&mut style, "height", format!("{logical_height}px"));
    set(&mut style, "position", "relative");
    set(
        &mut style,
        "justify-content",
        MainAxisAlignment::from(alignment).as_css(),
    );
    style
}

/// Style of the sticky renderer container: one viewport tall, pinned to
/// the top while the section scrolls past.
pub fn container_style(user: &StyleMap, debug: bool) -> StyleMap {
    let mut style = StyleMap::new();
    set(&mut style, "width", "100%");
    style.extend(user.iter().map(|(k, v)| (k.clone(), v.clone())));

    set(&mut style, "height", "100vh");
    set(&mut style, "position", "sticky");
    set(&mut style, "top", "0");
    if debug {
        set(&mut style, "border", CONTAINER_OUTLINE);
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(pairs: &[(&str, &str)]) -> StyleMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_alignment_maps_to_flex() {
        assert_eq!(
            MainAxisAlignment::from(HorizontalAlignment::Left).as_css(),
            "flex-start"
        );
        assert_eq!(
            MainAxisAlignment::from(HorizontalAlignment::Center).as_css(),
            "center"
        );
        assert_eq!(
            MainAxisAlignment::from(HorizontalAlignment::Right).as_css(),
            "flex-end"
        );
    }

    #[test]
    fn test_section_style_keeps_layout_properties() {
        let style = section_style(
            &user(&[("width", "80%"), ("height", "10px"), ("color", "white")]),
            2400.0,
            HorizontalAlignment::Right,
            false,
        );
        assert_eq!(style["width"], "80%");
        assert_eq!(style["color"], "white");
        assert_eq!(style["height"], "2400px");
        assert_eq!(style["justify-content"], "flex-end");
        assert!(!style.contains_key("border"));
    }

    #[test]
    fn test_debug_outlines() {
        let section = section_style(&StyleMap::new(), 1000.0, HorizontalAlignment::Center, true);
        let container = container_style(&user(&[("border", "none")]), true);
        assert_eq!(section["border"], "1px solid red");
        assert_eq!(container["border"], "1px solid blue");
    }

    #[test]
    fn test_user_border_kept_outside_debug_mode() {
        let border = user(&[("border", "none")]);
        let section = section_style(&border, 1000.0, HorizontalAlignment::Center, false);
        let container = container_style(&border, false);
        assert_eq!(section["border"], "none");
        assert_eq!(container["border"], "none");
    }

    #[test]
    fn test_container_is_sticky_viewport() {
        let style = container_style(&user(&[("position", "absolute")]), false);
        assert_eq!(style["position"], "sticky");
        assert_eq!(style["height"], "100vh");
        assert_eq!(style["top"], "0");
    }
}
