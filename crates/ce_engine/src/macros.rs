#[macro_export]
macro_rules! define_rule {
    (
        $(#[$meta:meta])*
        $struct_name:ident,
        $name_str:expr,
        $targets:expr, // Option<&'static [Builtin]>
        | $ev:ident, $arg:ident | $body:block
    ) => {
        $(#[$meta])*
        pub struct $struct_name;

        impl $crate::rule::Rule for $struct_name {
            fn name(&self) -> &str {
                $name_str
            }

            fn apply(
                &self,
                $ev: &mut $crate::eval::Evaluator<'_>,
                $arg: &$crate::boxed::BoxedExpr,
            ) -> Option<$crate::rule::Rewrite> {
                $body
            }

            fn targets(&self) -> Option<&'static [$crate::builtin::Builtin]> {
                $targets
            }
        }
    };
    // Overload for no targets (default None)
    (
        $(#[$meta:meta])*
        $struct_name:ident,
        $name_str:expr,
        | $ev:ident, $arg:ident | $body:block
    ) => {
        $crate::define_rule!(
            $(#[$meta])*
            $struct_name,
            $name_str,
            None,
            | $ev, $arg | $body
        );
    };
}
