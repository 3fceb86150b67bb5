//! Derive macros for the todo store
//!
//! This crate provides procedural macros that remove boilerplate from action
//! enums and state structs.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Classifies action variants as intents or feedback
//! - `#[derive(State)]` - Generates revision accessors for persisted state
//!
//! # Example
//!
//! ```ignore
//! use todo_store_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     #[intent]
//!     AddTodo { text: String },
//!
//!     #[feedback]
//!     NotificationExpired { generation: u64 },
//! }
//!
//! // Generated methods:
//! assert!(TodoAction::AddTodo { text: "milk".into() }.is_intent());
//! assert!(TodoAction::NotificationExpired { generation: 1 }.is_feedback());
//! assert_eq!(TodoAction::AddTodo { text: "milk".into() }.name(), "AddTodo");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, parse_macro_input};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_intent()` - Returns true if this variant is sent by the presentation layer
/// - `is_feedback()` - Returns true if this variant is produced by an effect
/// - `name()` - Returns the variant name, for logs and metrics labels
///
/// # Attributes
///
/// - `#[intent]` - Mark a variant as a user intent
/// - `#[feedback]` - Mark a variant as effect feedback
///
/// # Compile Errors
///
/// - Applied to a non-enum type
/// - A variant has both `#[intent]` and `#[feedback]` attributes
#[proc_macro_derive(Action, attributes(intent, feedback))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut intent_arms = Vec::new();
    let mut feedback_arms = Vec::new();
    let mut name_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_intent = has_attribute(&variant.attrs, "intent");
        let is_feedback = has_attribute(&variant.attrs, "feedback");

        if is_intent && is_feedback {
            return syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[intent] and #[feedback]",
            )
            .to_compile_error()
            .into();
        }

        let pattern = variant_pattern(&variant.ident, &variant.fields);
        let variant_name = variant.ident.to_string();

        if is_intent {
            intent_arms.push(quote! { #pattern => true, });
        }
        if is_feedback {
            feedback_arms.push(quote! { #pattern => true, });
        }
        name_arms.push(quote! { #pattern => #variant_name, });
    }

    let expanded = quote! {
        impl #name {
            /// Returns true if this action is a user intent
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_intent(&self) -> bool {
                match self {
                    #(#intent_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action was produced by an effect
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_feedback(&self) -> bool {
                match self {
                    #(#feedback_arms)*
                    _ => false,
                }
            }

            /// Returns the variant name
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Derive macro for State structs
///
/// Handles the revision counter marked with `#[revision]`. The field must be a
/// `u64`; the generated `bump_revision()` is what a reducer calls whenever the
/// persisted part of the state changes.
///
/// # Attributes
///
/// - `#[revision]` - Mark a field as the revision counter
///
/// # Compile Errors
///
/// - Applied to a non-struct type
/// - More than one field marked `#[revision]`
///
/// # Example
///
/// ```ignore
/// use todo_store_macros::State;
///
/// #[derive(State, Clone, Debug)]
/// struct ListState {
///     pub items: Vec<String>,
///     #[revision]
///     pub revision: u64,
/// }
/// ```
#[proc_macro_derive(State, attributes(revision))]
pub fn derive_state(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(State)] can only be used on structs")
            .to_compile_error()
            .into();
    };

    let mut revision_fields = data_struct
        .fields
        .iter()
        .filter(|field| has_attribute(&field.attrs, "revision"));

    let Some(field) = revision_fields.next() else {
        return TokenStream::new();
    };

    if let Some(extra) = revision_fields.next() {
        return syn::Error::new_spanned(extra, "Only one field may be marked #[revision]")
            .to_compile_error()
            .into();
    }

    let Some(field_name) = field.ident.as_ref() else {
        return syn::Error::new_spanned(field, "#[revision] requires a named field")
            .to_compile_error()
            .into();
    };

    let expanded = quote! {
        impl #name {
            /// Current revision of the persisted state
            #[must_use]
            pub const fn revision(&self) -> u64 {
                self.#field_name
            }

            /// Advance the revision, returning the new value
            pub fn bump_revision(&mut self) -> u64 {
                self.#field_name = self.#field_name.wrapping_add(1);
                self.#field_name
            }
        }
    };

    TokenStream::from(expanded)
}

/// Match pattern for a variant regardless of its field shape
fn variant_pattern(variant: &Ident, fields: &Fields) -> proc_macro2::TokenStream {
    match fields {
        Fields::Named(_) => quote! { Self::#variant { .. } },
        Fields::Unnamed(_) => quote! { Self::#variant(..) },
        Fields::Unit => quote! { Self::#variant },
    }
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
