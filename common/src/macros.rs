/// Declares a dense arena index: a `u32` newtype usable as a `Vec` position.
#[macro_export]
macro_rules! index_type {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Ord, PartialOrd, Debug, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(index: u32) -> $name {
                $name(index)
            }

            pub fn from_index(index: usize) -> $name {
                $name(u32::try_from(index).expect(concat!(stringify!($name), " overflow")))
            }

            pub const fn index(&self) -> usize {
                self.0 as usize
            }

            pub const fn raw(&self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}
