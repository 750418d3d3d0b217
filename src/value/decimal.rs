//! Deterministic extended-precision arithmetic for the decimal value variant.
//!
//! A [`Decimal`] is a sign, a normalized 64-bit binary significand, and an
//! unbounded binary exponent: `value = mant * 2^exp` with `mant` in
//! `[2^63, 2^64)` (zero is `mant == 0`). All operations round half-to-even
//! at 64 significand bits, in pure integer arithmetic; no hardware float is
//! involved anywhere, so results are identical on every platform.
//!
//! Rendering converts the exact binary value to decimal with exactly 15
//! fractional digits (round half-to-even) and strips trailing zeros and a
//! trailing point, so `10000000` rather than `10000000.000000000000000`.

use std::cmp::Ordering;
use std::fmt;

/// Maximum decimal exponent magnitude accepted by [`Decimal::parse`].
/// Anything further out is rejected (or flushed to zero on underflow).
const MAX_PARSE_EXP10: i64 = 9_999;

/// Significant decimal digits retained while parsing; further digits only
/// contribute to the sticky bit.
const MAX_PARSE_DIGITS: u32 = 38;

/// An extended-precision number: `sign * mant * 2^exp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    sign: bool,
    mant: u64,
    exp: i32,
}

impl Decimal {
    /// The canonical zero (unsigned).
    pub const ZERO: Decimal = Decimal {
        sign: false,
        mant: 0,
        exp: 0,
    };

    /// Convert an `i64` exactly.
    pub fn from_i64(v: i64) -> Self {
        Self::from_magnitude(v < 0, v.unsigned_abs())
    }

    /// Convert a `u64` exactly.
    pub fn from_u64(v: u64) -> Self {
        Self::from_magnitude(false, v)
    }

    fn from_magnitude(sign: bool, m: u64) -> Self {
        if m == 0 {
            return Self::ZERO;
        }
        let lz = m.leading_zeros() as i32;
        Self {
            sign,
            mant: m << lz,
            exp: -lz,
        }
    }

    /// True iff the value is zero.
    pub fn is_zero(&self) -> bool {
        self.mant == 0
    }

    /// True iff the value is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.mant != 0 && self.sign
    }

    /// Negation; zero stays canonical.
    pub fn neg(&self) -> Self {
        if self.mant == 0 {
            Self::ZERO
        } else {
            Self {
                sign: !self.sign,
                ..*self
            }
        }
    }

    /// Parse a decimal literal: optional sign, digits with an optional
    /// fractional part, optional `e`/`E` exponent. Rounds half-to-even to
    /// the working precision. Returns `None` for anything else.
    pub fn parse(input: &str) -> Option<Self> {
        let b = input.trim().as_bytes();
        let mut i = 0;

        let mut sign = false;
        if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
            sign = b[i] == b'-';
            i += 1;
        }

        let mut acc: u128 = 0;
        let mut kept = 0u32;
        let mut saw_digit = false;
        let mut dec_exp: i64 = 0;
        let mut sticky = false;

        while i < b.len() && b[i].is_ascii_digit() {
            saw_digit = true;
            let d = (b[i] - b'0') as u128;
            if kept < MAX_PARSE_DIGITS {
                acc = acc * 10 + d;
                if acc > 0 {
                    kept += 1;
                }
            } else {
                dec_exp += 1;
                sticky |= d != 0;
            }
            i += 1;
        }

        if i < b.len() && b[i] == b'.' {
            i += 1;
            while i < b.len() && b[i].is_ascii_digit() {
                saw_digit = true;
                let d = (b[i] - b'0') as u128;
                if kept < MAX_PARSE_DIGITS {
                    acc = acc * 10 + d;
                    if acc > 0 {
                        kept += 1;
                    }
                    dec_exp -= 1;
                } else {
                    sticky |= d != 0;
                }
                i += 1;
            }
        }

        if !saw_digit {
            return None;
        }

        if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
            i += 1;
            let mut esign = false;
            if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
                esign = b[i] == b'-';
                i += 1;
            }
            let mut any = false;
            let mut v: i64 = 0;
            while i < b.len() && b[i].is_ascii_digit() {
                any = true;
                v = (v * 10 + (b[i] - b'0') as i64).min(1_000_000);
                i += 1;
            }
            if !any {
                return None;
            }
            dec_exp += if esign { -v } else { v };
        }

        if i != b.len() {
            return None;
        }
        if acc == 0 {
            return Some(Self::ZERO);
        }
        if dec_exp < -MAX_PARSE_EXP10 {
            return Some(Self::ZERO);
        }
        if dec_exp > MAX_PARSE_EXP10 {
            return None;
        }

        // Scale acc * 10^dec_exp into binary, keeping the working value in
        // a wide range so each divide-by-ten loses only sticky bits.
        let mut w = acc;
        let mut we: i32 = 0;
        if dec_exp >= 0 {
            for _ in 0..dec_exp {
                while w >= 1u128 << 124 {
                    sticky |= w & 1 != 0;
                    w >>= 1;
                    we += 1;
                }
                w *= 10;
            }
        } else {
            for _ in 0..(-dec_exp) {
                while w < 1u128 << 96 {
                    w <<= 1;
                    we -= 1;
                }
                sticky |= w % 10 != 0;
                w /= 10;
            }
        }

        Some(Self::round_from_wide(sign, w, we, sticky))
    }

    /// Round `sign * wide * 2^exp` (plus a sub-ulp tail if `sticky`) to a
    /// normalized 64-bit significand, half-to-even.
    fn round_from_wide(sign: bool, mut wide: u128, mut exp: i32, sticky: bool) -> Self {
        debug_assert!(wide > 0);
        while wide < 1u128 << 127 {
            wide <<= 1;
            exp -= 1;
        }
        let mut mant = (wide >> 64) as u64;
        let low = wide as u64;
        const HALF: u64 = 1 << 63;
        let round_up = low > HALF || (low == HALF && (sticky || mant & 1 == 1));
        if round_up {
            let (next, overflow) = mant.overflowing_add(1);
            if overflow {
                mant = HALF;
                exp += 1;
            } else {
                mant = next;
            }
        }
        Self {
            sign,
            mant,
            exp: exp + 64,
        }
    }

    /// Addition, correctly rounded.
    pub fn add(&self, other: &Decimal) -> Decimal {
        if self.mant == 0 {
            return *other;
        }
        if other.mant == 0 {
            return *self;
        }

        // Widen both operands to 127 bits so alignment keeps exact guard
        // bits; the significand has 63 trailing zeros, so shifts up to 63
        // lose nothing.
        let a = ((self.mant as u128) << 63, self.exp - 63, self.sign);
        let b = ((other.mant as u128) << 63, other.exp - 63, other.sign);
        let (hi, lo) = if a.1 > b.1 || (a.1 == b.1 && a.0 >= b.0) {
            (a, b)
        } else {
            (b, a)
        };

        let d = hi.1 - lo.1;
        let (lo_shifted, sticky) = if d >= 128 {
            (0u128, true)
        } else {
            let d = d as u32;
            let mask = if d == 0 { 0 } else { (1u128 << d) - 1 };
            (lo.0 >> d, lo.0 & mask != 0)
        };

        if hi.2 == lo.2 {
            return Self::round_from_wide(hi.2, hi.0 + lo_shifted, hi.1, sticky);
        }

        let mut mag = hi.0 - lo_shifted;
        if sticky {
            // The discarded tail of the smaller operand borrows one unit.
            mag -= 1;
        }
        if mag == 0 {
            return Self::ZERO;
        }
        Self::round_from_wide(hi.2, mag, hi.1, sticky)
    }

    /// Subtraction, correctly rounded.
    pub fn sub(&self, other: &Decimal) -> Decimal {
        self.add(&other.neg())
    }

    /// Multiplication, correctly rounded.
    pub fn mul(&self, other: &Decimal) -> Decimal {
        if self.mant == 0 || other.mant == 0 {
            return Self::ZERO;
        }
        let wide = self.mant as u128 * other.mant as u128;
        Self::round_from_wide(self.sign != other.sign, wide, self.exp + other.exp, false)
    }

    /// Division, correctly rounded. `None` when the divisor is zero.
    pub fn div(&self, other: &Decimal) -> Option<Decimal> {
        if other.mant == 0 {
            return None;
        }
        if self.mant == 0 {
            return Some(Self::ZERO);
        }

        // Scale the dividend so the integer quotient lands in [2^63, 2^64);
        // the remainder then drives exact half-even rounding.
        let (n, e) = if self.mant >= other.mant {
            ((self.mant as u128) << 63, self.exp - other.exp - 63)
        } else {
            ((self.mant as u128) << 64, self.exp - other.exp - 64)
        };
        let divisor = other.mant as u128;
        let mut q = (n / divisor) as u64;
        let r = n % divisor;
        let mut exp = e;
        let twice = r * 2;
        if twice > divisor || (twice == divisor && q & 1 == 1) {
            let (next, overflow) = q.overflowing_add(1);
            if overflow {
                q = 1 << 63;
                exp += 1;
            } else {
                q = next;
            }
        }
        Some(Decimal {
            sign: self.sign != other.sign,
            mant: q,
            exp,
        })
    }

    /// Truncate toward zero into an `i64`. `None` when out of range.
    pub fn trunc_to_i64(&self) -> Option<i64> {
        if self.mant == 0 {
            return Some(0);
        }
        if self.exp > 0 {
            return None;
        }
        let mag = if self.exp == 0 {
            self.mant
        } else {
            let shift = -self.exp;
            if shift >= 64 {
                0
            } else {
                self.mant >> shift
            }
        };
        if self.sign {
            i64::try_from(-(mag as i128)).ok()
        } else {
            i64::try_from(mag).ok()
        }
    }

    fn magnitude_cmp(&self, other: &Decimal) -> Ordering {
        self.exp
            .cmp(&other.exp)
            .then(self.mant.cmp(&other.mant))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.mant == 0, other.mant == 0) {
            (true, true) => Ordering::Equal,
            (true, false) => {
                if other.sign {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (false, true) => {
                if self.sign {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (false, false) => {
                if self.sign != other.sign {
                    if self.sign {
                        Ordering::Less
                    } else {
                        Ordering::Greater
                    }
                } else if self.sign {
                    self.magnitude_cmp(other).reverse()
                } else {
                    self.magnitude_cmp(other)
                }
            }
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mant == 0 {
            return f.write_str("0");
        }

        // value * 10^15 == mant * 5^15 * 2^(exp + 15), exactly.
        const FIVE_POW_15: u128 = 30_517_578_125;
        let p = self.mant as u128 * FIVE_POW_15;
        let e = self.exp + 15;

        let digits = if e >= 0 {
            shifted_decimal_digits(p, e as u32)
        } else {
            let shift = (-e) as u32;
            let n = if shift >= 128 {
                0
            } else {
                let q = p >> shift;
                let rem = p & ((1u128 << shift) - 1);
                let half = 1u128 << (shift - 1);
                if rem > half || (rem == half && q & 1 == 1) {
                    q + 1
                } else {
                    q
                }
            };
            n.to_string()
        };

        let padded = if digits.len() < 16 {
            format!("{digits:0>16}")
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - 15);
        let frac_part = frac_part.trim_end_matches('0');

        let rounded_to_zero = frac_part.is_empty() && int_part.bytes().all(|c| c == b'0');
        if self.sign && !rounded_to_zero {
            f.write_str("-")?;
        }
        f.write_str(int_part)?;
        if !frac_part.is_empty() {
            f.write_str(".")?;
            f.write_str(frac_part)?;
        }
        Ok(())
    }
}

/// Decimal digits of `p << shift`, for shifts past the `u128` range.
fn shifted_decimal_digits(p: u128, shift: u32) -> String {
    if shift < p.leading_zeros() {
        return (p << shift).to_string();
    }

    // Little-endian u64 limbs.
    let mut limbs: Vec<u64> = vec![p as u64, (p >> 64) as u64];
    let words = (shift / 64) as usize;
    let bits = shift % 64;
    if words > 0 {
        let mut widened = vec![0u64; words];
        widened.extend_from_slice(&limbs);
        limbs = widened;
    }
    if bits > 0 {
        let mut carry = 0u64;
        for limb in limbs.iter_mut().skip(words) {
            let next_carry = *limb >> (64 - bits);
            *limb = (*limb << bits) | carry;
            carry = next_carry;
        }
        if carry > 0 {
            limbs.push(carry);
        }
    }

    // Peel 19-digit chunks off the low end.
    const CHUNK: u128 = 10_000_000_000_000_000_000;
    let mut chunks: Vec<u64> = Vec::new();
    while limbs.iter().any(|&l| l != 0) {
        let mut rem: u128 = 0;
        for limb in limbs.iter_mut().rev() {
            let cur = (rem << 64) | *limb as u128;
            *limb = (cur / CHUNK) as u64;
            rem = cur % CHUNK;
        }
        while limbs.len() > 1 && limbs.last() == Some(&0) {
            limbs.pop();
        }
        chunks.push(rem as u64);
    }

    let mut out = match chunks.pop() {
        Some(top) => top.to_string(),
        None => return "0".to_string(),
    };
    for chunk in chunks.iter().rev() {
        out.push_str(&format!("{chunk:019}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Decimal {
        Decimal::parse(s).unwrap()
    }

    #[test]
    fn parse_and_display_round_trip() {
        assert_eq!(p("11.345678901234").to_string(), "11.345678901234");
        assert_eq!(p("10e+6").to_string(), "10000000");
        assert_eq!(p("-13.34567").to_string(), "-13.34567");
        assert_eq!(p("0").to_string(), "0");
        assert_eq!(p("0.000").to_string(), "0");
        assert_eq!(p(".5").to_string(), "0.5");
        assert_eq!(p("1e18").to_string(), "1000000000000000000");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Decimal::parse("").is_none());
        assert!(Decimal::parse("abc").is_none());
        assert!(Decimal::parse("1.2.3").is_none());
        assert!(Decimal::parse("1e").is_none());
        assert!(Decimal::parse("--1").is_none());
        assert!(Decimal::parse("1 2").is_none());
    }

    #[test]
    fn underflow_flushes_to_zero() {
        assert_eq!(p("5e-20").to_string(), "0");
        assert_eq!(p("1e-100000").to_string(), "0");
        assert!(Decimal::parse("1e100000").is_none());
    }

    #[test]
    fn addition_preserves_precision_artifacts() {
        // The sum rounds at 64 significand bits, which is observable in the
        // fifteenth fractional digit at this magnitude.
        let sum = p("11.345678901234").add(&p("10e+6"));
        assert_eq!(sum.to_string(), "10000011.345678901234351");

        assert_eq!(p("11").add(&p("10e+6")).to_string(), "10000011");
        assert_eq!(p("11.1").add(&p("-13.34567")).to_string(), "-2.24567");
        assert_eq!(p("0.1").add(&p("0.2")).to_string(), "0.3");
    }

    #[test]
    fn subtraction() {
        assert_eq!(p("11.1").sub(&p("-13.34567")).to_string(), "24.44567");
        assert_eq!(p("1").sub(&p("1")).to_string(), "0");
    }

    #[test]
    fn multiplication() {
        assert_eq!(p("11.1").mul(&p("-13.34567")).to_string(), "-148.136937");
        assert_eq!(p("0").mul(&p("123.4")).to_string(), "0");
    }

    #[test]
    fn division_rounds_to_fifteen_fraction_digits() {
        assert_eq!(p("11").div(&p("13")).unwrap().to_string(), "0.846153846153846");
        assert_eq!(
            p("11.1").div(&p("-13.34567")).unwrap().to_string(),
            "-0.831730441409086"
        );
        assert_eq!(p("1").div(&p("3")).unwrap().to_string(), "0.333333333333333");
        assert_eq!(p("2").div(&p("3")).unwrap().to_string(), "0.666666666666667");
        assert!(p("1").div(&Decimal::ZERO).is_none());
    }

    #[test]
    fn comparisons() {
        assert!(p("6.1") > p("6.05"));
        assert!(p("6.1") < p("6.15"));
        assert!(p("-3") < p("-2"));
        assert!(p("-2") < p("1"));
        assert_eq!(p("2.50"), p("2.5"));
        assert_eq!(Decimal::ZERO, p("0.0"));
    }

    #[test]
    fn truncation() {
        assert_eq!(p("11.9").trunc_to_i64(), Some(11));
        assert_eq!(p("-11.9").trunc_to_i64(), Some(-11));
        assert_eq!(p("0.4").trunc_to_i64(), Some(0));
        assert_eq!(p("1e30").trunc_to_i64(), None);
        assert_eq!(
            Decimal::from_i64(i64::MIN).trunc_to_i64(),
            Some(i64::MIN)
        );
    }

    #[test]
    fn integer_conversions_are_exact() {
        assert_eq!(Decimal::from_i64(-2347).to_string(), "-2347");
        assert_eq!(Decimal::from_u64(u64::MAX).to_string(), "18446744073709551615");
        assert_eq!(
            Decimal::from_i64(i64::MAX).trunc_to_i64(),
            Some(i64::MAX)
        );
    }

    #[test]
    fn large_magnitudes_render_all_integer_digits() {
        // 10^21 needs only 49 significand bits, so it stays exact.
        assert_eq!(p("1e21").to_string(), "1000000000000000000000");
        // 10^30 needs 70 bits; the rendering shows the exact value of the
        // rounded significand rather than a prettied power of ten.
        assert_eq!(p("1e30").to_string(), "1000000000000000000024696061952");
    }
}
