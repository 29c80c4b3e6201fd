use crate::decode_table::TableMetadata;
use proc_macro2::TokenStream;
use quote::quote;

pub(crate) fn entity_trait(table: &TableMetadata) -> TokenStream {
    let ident = &table.item.ident;
    let name = ident.to_string();
    let table_name = &table.table;
    quote! {
        impl ::quarry::Entity for #ident {
            const NAME: &'static str = #name;
            const PATH: &'static str = ::std::concat!(::std::module_path!(), "::", #name);
            fn table_name() -> &'static str {
                #table_name
            }
            fn meta() -> ::quarry::Result<&'static ::quarry::EntityMeta> {
                static META: ::std::sync::OnceLock<::quarry::EntityMeta> = ::std::sync::OnceLock::new();
                ::quarry::EntityMeta::cached::<Self>(&META)
            }
        }
        ::quarry::inventory::submit! {
            ::quarry::EntityRegistration {
                name: #name,
                path: <#ident as ::quarry::Entity>::PATH,
                meta: <#ident as ::quarry::Entity>::meta,
            }
        }
    }
}
