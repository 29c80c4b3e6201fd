use crate::decode_table::TableMetadata;
use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

/// `pub const AGE: TableProperty<Person, i32>` for every persisted field that is not embedded.
pub(crate) fn table_properties(table: &TableMetadata) -> TokenStream {
    let name = &table.item.ident;
    let vis = &table.item.vis;
    let constants = table
        .persisted()
        .filter(|f| !f.embedded)
        .map(|f| {
            let ty = &f.ty;
            let property = f.property();
            let constant = Ident::new(
                property.trim_start_matches('_').to_case(Case::Constant).as_str(),
                f.ident.span(),
            );
            quote! {
                #vis const #constant: ::quarry::TableProperty<#name, #ty> =
                    ::quarry::TableProperty::new(#property);
            }
        });
    quote! {
        #[allow(dead_code)]
        impl #name {
            #(#constants)*
        }
    }
}
