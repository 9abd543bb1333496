//! Operator-overload shorthand for single-field newtype wrappers.

/// Implements a std::ops trait for a newtype by delegating to the inner value.
///
/// * `binary` — `Add`, `Sub` and friends (`T op T -> T`).
/// * `inplace` — `AddAssign`, `SubAssign` and friends (`T op= T`).
/// * `unary` — `Neg` and friends (`op T -> T`).
#[macro_export]
macro_rules! op {
    (binary $t:ty, $op:ident, $method:ident) => {
        impl std::ops::$op for $t {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self(std::ops::$op::$method(self.0, rhs.0))
            }
        }
    };
    (inplace $t:ty, $op:ident, $method:ident) => {
        impl std::ops::$op for $t {
            fn $method(&mut self, rhs: Self) {
                std::ops::$op::$method(&mut self.0, rhs.0);
            }
        }
    };
    (unary $t:ty, $op:ident, $method:ident) => {
        impl std::ops::$op for $t {
            type Output = Self;

            fn $method(self) -> Self::Output {
                Self(std::ops::$op::$method(self.0))
            }
        }
    };
}
