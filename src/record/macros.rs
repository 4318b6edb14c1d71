//! `record!` declares a plain-data record type and its descriptor
//!
//! ```rust,ignore
//! azbill::record! {
//!     /// Amount with currency
//!     pub struct Amount {
//!         currency: Optional<String> => "currency",
//!         value: Optional<f64> => "value",
//!         [skip] cached: i64,
//!     }
//! }
//! ```
//!
//! Each field is `ident: Type`, optionally followed by `=> "external name"`.
//! A leading `[skip]` excludes the field from output; `[internal]` marks it
//! as not externally visible. The generated struct derives serde with the
//! same external names, so transfer shapes deserialize straight from API
//! payloads. Marked fields are never serialized or deserialized and keep
//! their default value when decoded.

#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                $([$mark:ident])?
                $field:ident : $ty:ty $(=> $ext:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                $(#[serde(rename = $ext)])?
                // `$mark` only selects the repetition; the cfg_attr never applies
                $(#[serde(skip)] #[cfg_attr(any(), $mark)])?
                pub $field: $ty,
            )*
        }

        impl $crate::record::Record for $name {
            fn descriptor(&self) -> &'static $crate::record::RecordDescriptor {
                <Self as $crate::record::RecordType>::record_descriptor()
            }

            fn slots(&self) -> $crate::Result<::std::vec::Vec<$crate::record::Slot<'_>>> {
                Ok(::std::vec![$($crate::record::FieldType::slot(&self.$field)?),*])
            }
        }

        impl $crate::record::RecordType for $name {
            fn record_descriptor() -> &'static $crate::record::RecordDescriptor {
                static DESCRIPTOR: $crate::__private::Lazy<$crate::record::RecordDescriptor> =
                    $crate::__private::Lazy::new(|| {
                        $crate::record::RecordDescriptor::new(
                            stringify!($name),
                            ::std::vec![$(
                                $crate::record::FieldDescriptor::new(
                                    stringify!($field),
                                    <$ty as $crate::record::FieldType>::kind(),
                                )
                                $(.renamed($ext))?
                                .with_visibility($crate::__field_visibility!($($mark)?))
                                .optional(<$ty as $crate::record::FieldType>::optional())
                            ),*],
                        )
                    });
                &DESCRIPTOR
            }
        }

        impl $crate::record::FieldType for $name {
            fn kind() -> $crate::record::FieldKind {
                $crate::record::FieldKind::Record(
                    <$name as $crate::record::RecordType>::record_descriptor,
                )
            }

            fn slot(&self) -> $crate::Result<$crate::record::Slot<'_>> {
                Ok($crate::record::Slot::Record(::std::boxed::Box::new(self)))
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_visibility {
    () => {
        $crate::record::Visibility::Exported
    };
    (skip) => {
        $crate::record::Visibility::Excluded
    };
    (internal) => {
        $crate::record::Visibility::Internal
    };
}
