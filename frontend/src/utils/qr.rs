use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use qrcode::{render::svg, QrCode};

use crate::router::TEACHER_INVITATIONS_PATH;

// Characters that must not appear raw inside a `data:` URL attribute.
const DATA_URL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

pub fn svg_to_data_url(svg: &str) -> String {
    format!(
        "data:image/svg+xml;charset=utf-8,{}",
        utf8_percent_encode(svg, DATA_URL)
    )
}

/// Link a teacher opens (or scans) to accept an invitation.
pub fn invite_link(origin: &str, token: &str) -> String {
    format!(
        "{}{}?token={}",
        origin.trim_end_matches('/'),
        TEACHER_INVITATIONS_PATH,
        utf8_percent_encode(token, DATA_URL)
    )
}

/// QR code for `link` as an `<img>`-ready data URL. `None` when the payload
/// does not fit in a QR code.
pub fn qr_data_url(link: &str) -> Option<String> {
    let svg = QrCode::new(link.as_bytes())
        .map(|code| code.render::<svg::Color>().min_dimensions(200, 200).build())
        .map_err(|err| log::warn!("could not encode QR code: {}", err))
        .ok()?;
    Some(svg_to_data_url(&svg))
}

#[cfg(target_arch = "wasm32")]
pub fn current_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn current_origin() -> String {
    String::new()
}
