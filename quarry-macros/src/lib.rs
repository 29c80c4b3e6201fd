mod columns_trait;
mod decode_field;
mod decode_table;
mod entity_trait;
mod table_properties;

use columns_trait::columns_trait;
use decode_table::decode_table;
use entity_trait::entity_trait;
use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemStruct, parse_macro_input};
use table_properties::table_properties;

/// Maps a struct to a table.
///
/// Container attribute `#[quarry(table = "...")]`, the struct name is used otherwise.
/// Field attributes: `#[quarry(id)]`, `#[quarry(column = "...")]`, `#[quarry(ignore)]`
/// and `#[quarry(embedded)]` for fields whose type derives [`Embeddable`].
#[proc_macro_derive(Entity, attributes(quarry))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let table = decode_table(parse_macro_input!(input as ItemStruct));
    if !table.persisted().any(|_| true) {
        panic!("Entity `{}` has no persisted field", table.item.ident);
    }
    let columns = columns_trait(&table);
    let entity = entity_trait(&table);
    let properties = table_properties(&table);
    quote! {
        #columns
        #entity
        #properties
    }
    .into()
}

/// Columns of a struct stored inline in an entity, typically a composite id.
#[proc_macro_derive(Embeddable, attributes(quarry))]
pub fn derive_embeddable(input: TokenStream) -> TokenStream {
    let table = decode_table(parse_macro_input!(input as ItemStruct));
    columns_trait(&table).into()
}
