//! Theme color allocation
//!
//! Hues advance by the golden angle so any number of themes gets well
//! separated colors without a fixed palette. Saturation and lightness cycle
//! with periods 2 and 3 to pull neighbouring hues further apart.

/// Degrees between successive generated hues.
pub const GOLDEN_ANGLE: f64 = 137.508;

/// Color used for any theme id the store does not know.
pub const DEFAULT_COLOR: &str = "#0d6efd";

/// Returned by [`derive_translucent`] for colors it cannot parse.
pub const NEUTRAL_TRANSLUCENT: &str = "rgba(0,0,0,0.04)";

/// Alpha for modal backgrounds.
pub const BACKGROUND_ALPHA: f64 = 0.12;

/// Alpha for scatter point fills.
pub const FILL_ALPHA: f64 = 0.2;

/// Generate `count` colors as `hsl(...)` strings.
pub fn assign(count: usize) -> Vec<String> {
  (0..count).map(color_at).collect()
}

/// The color generated for position `index`, independent of the total count.
pub fn color_at(index: usize) -> String {
  let hue = (index as f64 * GOLDEN_ANGLE) % 360.0;
  let hue = (hue * 1000.0).round() / 1000.0;
  let saturation = 70 + (index % 2) * 10;
  let lightness = 55 + (index % 3) * 5;
  format!("hsl({hue}, {saturation}%, {lightness}%)")
}

/// Fill in colors for entries that lack one, leaving explicit colors alone.
///
/// Generated colors are indexed by position in `slots`, so a theme keeps the
/// same color whether or not its neighbours carry explicit ones.
pub fn fill_missing(slots: &mut [Option<String>]) {
  for (index, slot) in slots.iter_mut().enumerate() {
    let missing = slot.as_deref().map_or(true, |c| c.trim().is_empty());
    if missing {
      *slot = Some(color_at(index));
    }
  }
}

/// Low-opacity variant of `color` in the same notation.
///
/// `hsl(h, s%, l%)` becomes `hsla(h, s%, l%, alpha)` and `rgb(r, g, b)` becomes
/// `rgba(r, g, b, alpha)`. Anything else yields [`NEUTRAL_TRANSLUCENT`].
pub fn derive_translucent(color: &str, alpha: f64) -> String {
  let color = color.trim();

  if let Some(body) = functional_body(color, "hsl") {
    if parse_components(body).is_some() {
      return format!("hsla({}, {alpha})", body.trim());
    }
  }

  if let Some(body) = functional_body(color, "rgb") {
    if parse_components(body).is_some() {
      return format!("rgba({}, {alpha})", body.trim());
    }
  }

  NEUTRAL_TRANSLUCENT.to_string()
}

/// Resolve a CSS color to an RGB triple for terminal output.
pub fn to_rgb(color: &str) -> Option<(u8, u8, u8)> {
  let color = color.trim();

  if let Some(body) = functional_body(color, "hsl") {
    let [h, s, l] = parse_components(body)?;
    return Some(hsl_to_rgb(h, s / 100.0, l / 100.0));
  }

  if let Some(body) = functional_body(color, "rgb") {
    let [r, g, b] = parse_components(body)?;
    return Some((clamp_channel(r), clamp_channel(g), clamp_channel(b)));
  }

  parse_hex(color)
}

fn functional_body<'a>(color: &'a str, name: &str) -> Option<&'a str> {
  color.strip_prefix(name)?.strip_prefix('(')?.strip_suffix(')')
}

/// Exactly three numeric components, `%` suffixes allowed.
fn parse_components(body: &str) -> Option<[f64; 3]> {
  let parts: Vec<&str> = body.split(',').collect();
  if parts.len() != 3 {
    return None;
  }

  let mut values = [0.0; 3];
  for (slot, part) in values.iter_mut().zip(parts) {
    *slot = part.trim().trim_end_matches('%').trim().parse().ok()?;
  }
  Some(values)
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
  let hex = color.strip_prefix('#')?;
  if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
    return None;
  }

  match hex.len() {
    6 => Some((
      u8::from_str_radix(&hex[0..2], 16).ok()?,
      u8::from_str_radix(&hex[2..4], 16).ok()?,
      u8::from_str_radix(&hex[4..6], 16).ok()?,
    )),
    3 => {
      let expand = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
      Some((expand(0)?, expand(1)?, expand(2)?))
    }
    _ => None,
  }
}

fn clamp_channel(value: f64) -> u8 {
  value.round().clamp(0.0, 255.0) as u8
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
  let s = saturation.clamp(0.0, 1.0);
  let l = lightness.clamp(0.0, 1.0);
  let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
  let h = hue.rem_euclid(360.0) / 60.0;
  let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());

  let (r, g, b) = match h as u32 {
    0 => (chroma, x, 0.0),
    1 => (x, chroma, 0.0),
    2 => (0.0, chroma, x),
    3 => (0.0, x, chroma),
    4 => (x, 0.0, chroma),
    _ => (chroma, 0.0, x),
  };

  let m = l - chroma / 2.0;
  let channel = |v: f64| clamp_channel((v + m) * 255.0);
  (channel(r), channel(g), channel(b))
}
