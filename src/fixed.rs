use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of fractional bits in a [`Fixed`].
pub const FRAC_BITS: u32 = 16;

const ONE_RAW: i32 = 1 << FRAC_BITS;

/// Deterministic Q16.16 scalar used for all collision geometry.
///
/// Every operation is integer arithmetic on the raw value, so results are
/// bit-identical on every platform. Overflow saturates instead of wrapping.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(i32);

#[inline]
fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(ONE_RAW);
    pub const HALF: Fixed = Fixed(ONE_RAW / 2);
    /// Smallest positive value (one raw unit).
    pub const EPSILON: Fixed = Fixed(1);
    pub const MIN: Fixed = Fixed(i32::MIN);
    pub const MAX: Fixed = Fixed(i32::MAX);

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Fixed(raw)
    }

    /// Integers outside the 16-bit integer part saturate to [`Fixed::MIN`] or [`Fixed::MAX`].
    #[inline]
    pub const fn from_int(v: i32) -> Self {
        if v > i16::MAX as i32 {
            Fixed::MAX
        } else if v < i16::MIN as i32 {
            Fixed::MIN
        } else {
            Fixed(v << FRAC_BITS)
        }
    }

    /// Round a float to the nearest raw unit. Only used for loading configuration.
    pub fn from_f64(v: f64) -> Self {
        let scaled = (v * ONE_RAW as f64).round();
        if scaled.is_nan() {
            return Fixed::ZERO;
        }
        Fixed(scaled.clamp(i32::MIN as f64, i32::MAX as f64) as i32)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Lossy conversion for rendering and debug output.
    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / ONE_RAW as f32
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / ONE_RAW as f64
    }

    #[inline]
    pub const fn floor(self) -> i32 {
        self.0 >> FRAC_BITS
    }

    #[inline]
    pub const fn ceil(self) -> i32 {
        ((self.0 as i64 + (ONE_RAW as i64 - 1)) >> FRAC_BITS) as i32
    }

    /// Exact `floor(self / rhs)` as an integer. Saturates when `rhs` is zero.
    pub fn div_floor(self, rhs: Fixed) -> i32 {
        if rhs.0 == 0 {
            return if self.0 >= 0 { i32::MAX } else { i32::MIN };
        }
        let (a, b) = (self.0 as i64, rhs.0 as i64);
        let q = if b > 0 { a.div_euclid(b) } else { (-a).div_euclid(-b) };
        saturate(q)
    }

    #[inline]
    pub fn abs(self) -> Self {
        Fixed(self.0.saturating_abs())
    }

    /// -1, 0 or 1.
    #[inline]
    pub const fn signum(self) -> i32 {
        self.0.signum()
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        if other.0 < self.0 { other } else { self }
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        if other.0 > self.0 { other } else { self }
    }

    #[inline]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }

    /// `self * num / den` with a single rounding step (toward negative infinity).
    pub fn mul_div(self, num: Fixed, den: Fixed) -> Fixed {
        if den.0 == 0 {
            return Fixed::saturated_sign(self.0 as i64 * num.0 as i64);
        }
        let (p, d) = (self.0 as i128 * num.0 as i128, den.0 as i128);
        let q = if d > 0 { p.div_euclid(d) } else { (-p).div_euclid(-d) };
        Fixed(q.clamp(i32::MIN as i128, i32::MAX as i128) as i32)
    }

    fn saturated_sign(v: i64) -> Fixed {
        match v.signum() {
            1 => Fixed::MAX,
            -1 => Fixed::MIN,
            _ => Fixed::ZERO,
        }
    }
}

impl From<i32> for Fixed {
    fn from(v: i32) -> Self {
        Fixed::from_int(v)
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(self.0.saturating_neg())
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed(saturate((self.0 as i64 * rhs.0 as i64) >> FRAC_BITS))
    }
}

impl Div for Fixed {
    type Output = Fixed;
    fn div(self, rhs: Fixed) -> Fixed {
        if rhs.0 == 0 {
            return Fixed::saturated_sign(self.0 as i64);
        }
        Fixed(saturate(((self.0 as i64) << FRAC_BITS) / rhs.0 as i64))
    }
}

impl Mul<i32> for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, rhs: i32) -> Fixed {
        Fixed(saturate(self.0 as i64 * rhs as i64))
    }
}

impl Div<i32> for Fixed {
    type Output = Fixed;
    fn div(self, rhs: i32) -> Fixed {
        if rhs == 0 {
            return Fixed::saturated_sign(self.0 as i64);
        }
        Fixed(saturate(self.0 as i64 / rhs as i64))
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Fixed) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fixed {
    fn mul_assign(&mut self, rhs: Fixed) {
        *self = *self * rhs;
    }
}

impl DivAssign for Fixed {
    fn div_assign(&mut self, rhs: Fixed) {
        *self = *self / rhs;
    }
}

// Configuration files carry plain numbers; they are rounded once at load time.
impl Serialize for Fixed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Fixed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Fixed::from_f64)
    }
}
