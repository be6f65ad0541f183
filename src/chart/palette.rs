// src/chart/palette.rs
use once_cell::sync::Lazy;
use std::collections::HashMap;

// XKCD survey hexes for the handful of color words the sheet owner picked.
const RED: &str = "#E50000";
const GREY: &str = "#929591";
const LAVENDER: &str = "#C79FEF";
const CYAN: &str = "#00FFFF";
const WHITE: &str = "#FFFFFF";
const FUCHSIA: &str = "#ED0DD9";
const YELLOW: &str = "#FFFF14";
const PURPLE: &str = "#7E1E9C";
const AZURE: &str = "#069AF3";
const LIME: &str = "#AAFF32";
const GREEN: &str = "#15B01A";
const LIGHT_GREEN: &str = "#96F97B";
const PINK: &str = "#FF81C0";
const ORANGE: &str = "#F97306";
const CORAL: &str = "#FC5A50";

/// Color for names the palette does not know (plotly's default trace blue).
pub const FALLBACK_COLOR: &str = "#636EFA";

/// Fixed name→color assignments so a performer keeps their color across every
/// chart kind and every render.
static PALETTE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Suzy", RED),
        ("OTHERS", GREY),
        ("七瀬千夏", RED),
        ("天音ゆめ", LAVENDER),
        ("恵深あむ", RED),
        ("楠木りほ", CYAN),
        ("雅春奈", RED),
        ("椎名まどか", CYAN),
        ("中谷亜優", WHITE),
        ("石田綾音", FUCHSIA),
        ("濱崎みき", WHITE),
        ("瀬乃悠月", RED),
        ("天使 さな", YELLOW),
        ("のえる", PURPLE),
        ("火野快飛", AZURE),
        ("メグ・ピッチ・オリオン", LIME),
        ("コイヌ フユ", YELLOW),
        ("涼乃みほ", CYAN),
        ("松島朱里", GREEN),
        ("星名 夢音", LIGHT_GREEN),
        ("雨宮れいな", WHITE),
        ("岬あやめ", YELLOW),
        ("鳴上綺羅", CYAN),
        ("桜衣みゆな", PINK),
        ("Joyce", GREEN),
        ("木戸怜緒奈", CYAN),
        ("原田真帆", CORAL),
        ("侑之りせ", WHITE),
        ("南 歩唯", PINK),
        ("昊乃ひな", ORANGE),
        ("日向なの", ORANGE),
        ("きゃりー", YELLOW),
        ("もしかして、るか", YELLOW),
    ])
});

pub fn color_for(name: &str) -> &'static str {
    PALETTE.get(name).copied().unwrap_or(FALLBACK_COLOR)
}
