//! Runtime value introspection.
//!
//! A [`Value`] is a typed, possibly absent, runtime value: scalars, strings,
//! fixed arrays, slices, maps, records, pointers, interfaces, channels and
//! functions. Slices, maps and pointers share their storage on clone, the
//! way references do, so mutation through one handle is visible through
//! every other.
//!
//! On top of that model the crate provides:
//!
//! - [`to_instance`] / [`origin_of`]: peel the pointer and interface layers
//!   off a value and rebuild them around a replacement.
//! - [`equal`]: structural equality that follows pointers and ignores
//!   storage identity.
//! - [`duplicate`]: deep copy, unexported record fields included. Nested
//!   pointers keep their targets; the top-level layers are rebuilt fresh.
//! - [`get_field`] / [`set_field`]: named access to exported record fields.
//! - [`array_equal`] and friends: index-wise and order-insensitive sequence
//!   comparison, with `*_info` variants that explain the first difference.
//!
//! # Tracing
//!
//! Every module logs through `tracing`. With the `subscriber` feature,
//! [`init_tracing`] installs a subscriber driven by `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=meta=debug cargo test
//! RUST_LOG=meta::compare=trace cargo test
//! ```

mod compare;
mod data;
mod duplicate;
mod errors;
mod field;
mod instance;
mod stack;
mod types;
mod value;

pub use compare::{equal, value_equal};
pub use data::{
    array_equal, array_equal_info, array_instance_equal, array_instance_equal_info,
    array_item_equal, array_item_equal_info, array_item_instance_equal,
    array_item_instance_equal_info, instance_equal,
};
pub use duplicate::{duplicate, duplicate_instance};
pub use errors::{ErrorCategory, MetaError, MetaResult, Side};
pub use field::{get_field, set_field};
pub use instance::{
    instance_of, is_instance, is_pointer, is_struct, new_pointer_of, nil_state, origin_of,
    to_instance, unbox, Layer, LayerKind, NilState, RefChain,
};
pub use stack::ensure_sufficient_stack;
pub use types::{is_exported_name, Field, Kind, Type, TypeKind, Visibility};
pub use value::{Data, Handle, MapData, MapKey, Shared, Value};

#[cfg(feature = "subscriber")]
static TRACING_INIT: std::sync::Once = std::sync::Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset. Safe to call more than once.
#[cfg(feature = "subscriber")]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
