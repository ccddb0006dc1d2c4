//! Reads SVG path data back into polygon rings so shapes can be hit tested.
//!
//! Only vertices matter for hit testing: straight segments are kept as they
//! are and curves/arcs collapse to their end points.

/// Closed rings recovered from one path's `d` attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    rings: Vec<Vec<(f64, f64)>>,
    bbox: Option<(f64, f64, f64, f64)>, // (min_x, min_y, max_x, max_y)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char),
    Number(f64),
}

impl Outline {
    /// Parse path data. Never fails: reading stops at the first token that
    /// does not fit, keeping every ring read up to that point.
    pub fn parse(d: &str) -> Self {
        let tokens = tokenize(d);
        let mut rings = Vec::new();
        let mut ring: Vec<(f64, f64)> = Vec::new();
        let mut cur = (0.0, 0.0);
        let mut start = (0.0, 0.0);
        let mut cmd: Option<char> = None;
        let mut i = 0;

        while i < tokens.len() {
            if let Token::Command(c) = tokens[i] {
                i += 1;
                if c == 'Z' || c == 'z' {
                    if !ring.is_empty() {
                        rings.push(std::mem::take(&mut ring));
                    }
                    cur = start;
                    cmd = None;
                    continue;
                }
                if arity(c).is_none() {
                    break;
                }
                cmd = Some(c);
                continue;
            }

            let Some(c) = cmd else { break };
            let Some(n) = arity(c) else { break };
            let Some(args) = numbers(&tokens[i..], n) else { break };
            i += n;

            let rel = c.is_ascii_lowercase();
            let point = |x: f64, y: f64, cur: (f64, f64)| {
                if rel { (cur.0 + x, cur.1 + y) } else { (x, y) }
            };

            match c.to_ascii_uppercase() {
                'M' => {
                    if !ring.is_empty() {
                        rings.push(std::mem::take(&mut ring));
                    }
                    cur = point(args[0], args[1], cur);
                    start = cur;
                    ring.push(cur);
                    // further pairs after a moveto are linetos
                    cmd = Some(if rel { 'l' } else { 'L' });
                }
                'L' | 'T' => {
                    cur = point(args[0], args[1], cur);
                    ring.push(cur);
                }
                'H' => {
                    cur.0 = if rel { cur.0 + args[0] } else { args[0] };
                    ring.push(cur);
                }
                'V' => {
                    cur.1 = if rel { cur.1 + args[0] } else { args[0] };
                    ring.push(cur);
                }
                'C' => {
                    cur = point(args[4], args[5], cur);
                    ring.push(cur);
                }
                'S' | 'Q' => {
                    cur = point(args[2], args[3], cur);
                    ring.push(cur);
                }
                'A' => {
                    cur = point(args[5], args[6], cur);
                    ring.push(cur);
                }
                _ => break,
            }
        }
        if !ring.is_empty() {
            rings.push(ring);
        }

        let bbox = bounding_box(&rings);
        Self { rings, bbox }
    }

    pub fn rings(&self) -> &[Vec<(f64, f64)>] {
        &self.rings
    }

    /// Even-odd point-in-polygon test over every ring, so holes and
    /// separate islands both behave.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        match self.bbox {
            Some((min_x, min_y, max_x, max_y))
                if x >= min_x && x <= max_x && y >= min_y && y <= max_y => {}
            _ => return false,
        }
        self.rings
            .iter()
            .filter(|ring| point_in_ring(x, y, ring))
            .count()
            % 2
            == 1
    }
}

fn arity(cmd: char) -> Option<usize> {
    match cmd.to_ascii_uppercase() {
        'M' | 'L' | 'T' => Some(2),
        'H' | 'V' => Some(1),
        'S' | 'Q' => Some(4),
        'C' => Some(6),
        'A' => Some(7),
        _ => None,
    }
}

fn numbers(tokens: &[Token], n: usize) -> Option<Vec<f64>> {
    if tokens.len() < n {
        return None;
    }
    tokens[..n]
        .iter()
        .map(|t| match t {
            Token::Number(v) => Some(*v),
            Token::Command(_) => None,
        })
        .collect()
}

fn tokenize(d: &str) -> Vec<Token> {
    let bytes = d.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' | b'\n' | b'\r' | b',' => i += 1,
            b'+' | b'-' | b'.' | b'0'..=b'9' => {
                let Some((value, len)) = lex_number(&d[i..]) else { break };
                tokens.push(Token::Number(value));
                i += len;
            }
            c if c.is_ascii_alphabetic() => {
                tokens.push(Token::Command(c as char));
                i += 1;
            }
            _ => break,
        }
    }
    tokens
}

/// Longest number at the start of `s`, e.g. `-1.5e3`. `"1.5.5"` reads as
/// `1.5` followed by `.5`.
fn lex_number(s: &str) -> Option<(f64, usize)> {
    let b = s.as_bytes();
    let mut end = 0;
    let mut digits = 0;
    if end < b.len() && (b[end] == b'+' || b[end] == b'-') {
        end += 1;
    }
    while end < b.len() && b[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < b.len() && b[end] == b'.' {
        end += 1;
        while end < b.len() && b[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < b.len() && (b[end] == b'e' || b[end] == b'E') {
        let mut exp = end + 1;
        if exp < b.len() && (b[exp] == b'+' || b[exp] == b'-') {
            exp += 1;
        }
        let exp_digits = exp;
        while exp < b.len() && b[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits {
            end = exp;
        }
    }
    s[..end].parse().ok().map(|v| (v, end))
}

/// Ray-casting point-in-ring test.
fn point_in_ring(x: f64, y: f64, ring: &[(f64, f64)]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn bounding_box(rings: &[Vec<(f64, f64)>]) -> Option<(f64, f64, f64, f64)> {
    let mut points = rings.iter().flatten();
    let &(x0, y0) = points.next()?;
    Some(points.fold((x0, y0, x0, y0), |(min_x, min_y, max_x, max_y), &(x, y)| {
        (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
    }))
}
