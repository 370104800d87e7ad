//! RFC 3492 punycode codec.
//!
//! Bootstring encoding with the punycode parameter set: base 36, tmin 1,
//! tmax 26, skew 38, damp 700, initial bias 72, initial n 128, delimiter
//! `-`. The encoder is bit-exact with the RFC reference behavior, including
//! the trailing delimiter it emits for all-ASCII input; callers that must
//! leave ASCII labels untouched have to skip the call themselves (see
//! [`crate::host::DomainName`]).
//!
//! All arithmetic is overflow-checked; an overflow yields `None` instead of
//! a wrapped value, matching the RFC's "fail on overflow" requirement.

const BASE: u32 = 36;
const TMIN: u32 = 1;
const TMAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 128;
const DELIMITER: char = '-';

/// Bias adaptation function from RFC 3492 §6.1.
fn adapt(delta: u32, num_points: u32, first_time: bool) -> u32 {
    let mut delta = if first_time { delta / DAMP } else { delta / 2 };
    delta += delta / num_points;

    let mut k = 0;
    while delta > ((BASE - TMIN) * TMAX) / 2 {
        delta /= BASE - TMIN;
        k += BASE;
    }
    k + ((BASE - TMIN + 1) * delta) / (delta + SKEW)
}

/// Maps a digit value 0..36 to its basic code point: 0-25 -> `a`-`z`,
/// 26-35 -> `0`-`9`.
fn digit_to_char(digit: u32) -> Option<char> {
    match digit {
        0..=25 => char::from_u32('a' as u32 + digit),
        26..=35 => char::from_u32('0' as u32 + digit - 26),
        _ => None,
    }
}

/// Maps a basic code point back to its digit value.
fn char_to_digit(c: char) -> Option<u32> {
    match c {
        'a'..='z' => Some(c as u32 - 'a' as u32),
        'A'..='Z' => Some(c as u32 - 'A' as u32),
        '0'..='9' => Some(c as u32 - '0' as u32 + 26),
        _ => None,
    }
}

/// Encodes a Unicode label into its punycode form (without the `xn--`
/// ACE prefix).
///
/// Returns `None` on arithmetic overflow, which can only happen for inputs
/// far beyond any legal DNS label.
///
/// ```
/// use pagenet::host::punycode;
///
/// assert_eq!(punycode::encode("bücher").as_deref(), Some("bcher-kva"));
/// ```
pub fn encode(input: &str) -> Option<String> {
    let code_points: Vec<u32> = input.chars().map(|c| c as u32).collect();

    // Basic code points are copied verbatim, in order.
    let mut output: String = input.chars().filter(|c| c.is_ascii()).collect();
    let basic_len = output.chars().count() as u32;

    if basic_len > 0 {
        output.push(DELIMITER);
    }

    let mut n = INITIAL_N;
    let mut delta: u32 = 0;
    let mut bias = INITIAL_BIAS;
    let mut handled = basic_len;
    let total = code_points.len() as u32;

    while handled < total {
        // Smallest code point >= n among the unhandled ones.
        let m = *code_points.iter().filter(|&&c| c >= n).min()?;
        delta = delta.checked_add(m.checked_sub(n)?.checked_mul(handled + 1)?)?;
        n = m;

        for &c in &code_points {
            if c < n {
                delta = delta.checked_add(1)?;
            }
            if c == n {
                let mut q = delta;
                let mut k = BASE;
                loop {
                    let t = threshold(k, bias);
                    if q < t {
                        break;
                    }
                    output.push(digit_to_char(t + (q - t) % (BASE - t))?);
                    q = (q - t) / (BASE - t);
                    k += BASE;
                }
                output.push(digit_to_char(q)?);
                bias = adapt(delta, handled + 1, handled == basic_len);
                delta = 0;
                handled += 1;
            }
        }

        delta = delta.checked_add(1)?;
        n = n.checked_add(1)?;
    }

    Some(output)
}

/// Decodes a punycode label (without the `xn--` prefix) back to Unicode.
///
/// Returns `None` on malformed input or arithmetic overflow.
pub fn decode(input: &str) -> Option<String> {
    // Everything before the last delimiter is copied verbatim.
    let (basic, extended) = match input.rfind(DELIMITER) {
        Some(pos) => (&input[..pos], &input[pos + 1..]),
        None => ("", input),
    };
    if !basic.chars().all(|c| c.is_ascii()) {
        return None;
    }

    let mut output: Vec<char> = basic.chars().collect();
    let mut n = INITIAL_N;
    let mut i: u32 = 0;
    let mut bias = INITIAL_BIAS;

    let mut chars = extended.chars();
    while !chars.as_str().is_empty() {
        let old_i = i;
        let mut weight: u32 = 1;
        let mut k = BASE;
        loop {
            let digit = char_to_digit(chars.next()?)?;
            i = i.checked_add(digit.checked_mul(weight)?)?;
            let t = threshold(k, bias);
            if digit < t {
                break;
            }
            weight = weight.checked_mul(BASE - t)?;
            k += BASE;
        }

        let len = output.len() as u32 + 1;
        bias = adapt(i - old_i, len, old_i == 0);
        n = n.checked_add(i / len)?;
        i %= len;

        let c = char::from_u32(n)?;
        output.insert(i as usize, c);
        i += 1;
    }

    Some(output.into_iter().collect())
}

fn threshold(k: u32, bias: u32) -> u32 {
    if k <= bias {
        TMIN
    } else if k >= bias + TMAX {
        TMAX
    } else {
        k - bias
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_single_char() {
        assert_eq!(encode("ü").as_deref(), Some("tda"));
    }

    #[test]
    fn test_encode_mixed_label() {
        // RFC 3492 reference vector used throughout IDNA documentation.
        assert_eq!(encode("bücher").as_deref(), Some("bcher-kva"));
    }

    #[test]
    fn test_encode_all_ascii_appends_delimiter() {
        // The raw algorithm emits a trailing delimiter for pure-ASCII
        // input; DomainName must never call it for ASCII labels.
        assert_eq!(encode("abc").as_deref(), Some("abc-"));
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode("").as_deref(), Some(""));
    }

    #[test]
    fn test_rfc_sample_arabic() {
        // RFC 3492 §7.1 (A): Arabic (Egyptian).
        let input = "\u{0644}\u{064A}\u{0647}\u{0645}\u{0627}\u{0628}\u{062A}\u{0643}\u{0644}\
                     \u{0645}\u{0648}\u{0634}\u{0639}\u{0631}\u{0628}\u{064A}\u{061F}";
        assert_eq!(encode(input).as_deref(), Some("egbpdaj6bu4bxfgehfvwxn"));
    }

    #[test]
    fn test_rfc_sample_chinese() {
        // RFC 3492 §7.1 (B): Chinese (simplified).
        let input = "\u{4ED6}\u{4EEC}\u{4E3A}\u{4EC0}\u{4E48}\u{4E0D}\u{8BF4}\u{4E2D}\u{6587}";
        assert_eq!(encode(input).as_deref(), Some("ihqwcrb4cv8a8dqg056pqjye"));
    }

    #[test]
    fn test_rfc_sample_mixed_case_ascii() {
        // RFC 3492 §7.1 (P): Maji<de>Koi<suru>5<byou><mae>
        let input = "Maji\u{3067}Koi\u{3059}\u{308B}5\u{79D2}\u{524D}";
        assert_eq!(encode(input).as_deref(), Some("MajiKoi5-783gue6qz075azm5e"));
    }

    #[test]
    fn test_decode_round_trip() {
        for label in ["bücher", "münchen", "παράδειγμα", "例え", "🦀rust"] {
            let encoded = encode(label).unwrap();
            assert_eq!(decode(&encoded).as_deref(), Some(label), "label {label}");
        }
    }

    #[test]
    fn test_decode_rejects_non_digit() {
        assert_eq!(decode("a-!!"), None);
    }
}
