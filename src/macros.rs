/// Forwards an operator implemented on `&T op &T` to the owned and mixed
/// operand combinations.
macro_rules! forward_binop {
    (impl $imp:ident for $t:ty, $method:ident) => {
        impl $imp<$t> for $t {
            type Output = $t;

            #[inline]
            fn $method(self, other: $t) -> $t {
                (&self).$method(&other)
            }
        }

        impl<'a> $imp<&'a $t> for $t {
            type Output = $t;

            #[inline]
            fn $method(self, other: &$t) -> $t {
                (&self).$method(other)
            }
        }

        impl<'a> $imp<$t> for &'a $t {
            type Output = $t;

            #[inline]
            fn $method(self, other: $t) -> $t {
                self.$method(&other)
            }
        }
    };
}
