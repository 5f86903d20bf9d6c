//! Macros used to declare the rule catalog.
//!
//! - `rule_kinds!`: declares [`RuleKind`](crate::rule::RuleKind) together
//!   with its wire tags, categories, summaries and parameter specs, so the
//!   table used for dispatch and the table used for discovery cannot drift.

// ============================================================================
// RULE KINDS MACRO
// ============================================================================

/// Declares the closed set of rule kinds.
///
/// Each entry reads `Variant => "tag", Category, "summary", [params...];`
/// where every param is a `ParamSpec` constant expression.
///
/// ```rust,ignore
/// rule_kinds! {
///     Range => "range", Constraint, "Number lies within inclusive bounds", [
///         ParamSpec::required("min_value", Shape::Number),
///         ParamSpec::required("max_value", Shape::Number),
///     ];
/// }
/// ```
macro_rules! rule_kinds {
    (
        $(
            $variant:ident => $tag:literal, $category:ident, $summary:literal,
                [$($param:expr),* $(,)?];
        )+
    ) => {
        /// Every validation kind the engine understands.
        ///
        /// The wire form is the snake_case tag returned by
        /// [`RuleKind::as_str`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum RuleKind {
            $(
                #[doc = $summary]
                $variant,
            )+
        }

        impl RuleKind {
            /// The whole catalog, in declaration order.
            pub const ALL: &'static [RuleKind] = &[$(RuleKind::$variant,)+];

            /// Wire tag.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)+
                }
            }

            /// Discovery category.
            #[must_use]
            pub fn category(self) -> Category {
                match self {
                    $(Self::$variant => Category::$category,)+
                }
            }

            /// One-line description.
            #[must_use]
            pub fn summary(self) -> &'static str {
                match self {
                    $(Self::$variant => $summary,)+
                }
            }

            /// Declared parameters, in positional order.
            #[must_use]
            pub fn params(self) -> &'static [ParamSpec] {
                match self {
                    $(
                        Self::$variant => {
                            const PARAMS: &[ParamSpec] = &[$($param),*];
                            PARAMS
                        }
                    )+
                }
            }

            fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $($tag => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}
