//! Macros for reducing boilerplate when defining listable entities

/// Define a listable entity with its [`Entity`](crate::core::entity::Entity) implementation
///
/// The generated struct carries an `id` and a `created_at` timestamp in
/// addition to the declared fields. Every field, including those two, is
/// registered in the field registry under its Rust name, so it can be used
/// for sorting and searching. Declared field types must convert into
/// [`FieldValue`](crate::core::field::FieldValue).
///
/// # Example
///
/// ```rust,ignore
/// use folio::prelude::*;
///
/// impl_entity!(
///     Post,
///     "post",
///     "posts",
///     search: ["title", "body"],
///     {
///         title: String,
///         body: String,
///         likes: i64,
///     }
/// );
///
/// let post = Post::new("Hello".to_string(), "First post".to_string(), 3);
/// ```
#[macro_export]
macro_rules! impl_entity {
    (
        $type:ident,
        $singular:expr,
        $plural:expr,
        search: [ $( $searchable:expr ),* $(,)? ],
        {
            $( $field:ident : $field_type:ty ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Unique identifier for this entity
            pub id: ::uuid::Uuid,

            /// When this entity was created
            pub created_at: ::chrono::DateTime<::chrono::Utc>,
            $( pub $field : $field_type ),*
        }

        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn field_registry() -> $crate::core::field::FieldRegistry<Self> {
                $crate::core::field::FieldRegistry::new($singular)
                    .with_field("id", |e: &$type| {
                        $crate::core::field::FieldValue::from(e.id)
                    })
                    .with_field("created_at", |e: &$type| {
                        $crate::core::field::FieldValue::from(e.created_at)
                    })
                    $(
                        .with_field(stringify!($field), |e: &$type| {
                            $crate::core::field::FieldValue::from(e.$field.clone())
                        })
                    )*
            }

            fn searchable_fields() -> &'static [&'static str] {
                &[ $( $searchable ),* ]
            }
        }

        impl $type {
            /// Create a new instance with a fresh id, created now
            #[allow(clippy::too_many_arguments)]
            pub fn new( $( $field: $field_type ),* ) -> Self {
                Self {
                    id: ::uuid::Uuid::new_v4(),
                    created_at: ::chrono::Utc::now(),
                    $( $field ),*
                }
            }
        }
    };
}
