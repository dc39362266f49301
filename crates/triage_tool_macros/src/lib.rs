use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, Expr, Lit, Meta, parse_macro_input};

/// Implements `triage_domain::ToolDescription` using the type's doc comment as
/// the description shown to the oracle. Consecutive doc lines are joined with
/// a space; blank doc lines start a new paragraph.
#[proc_macro_derive(ToolDescription)]
pub fn derive_description(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut paragraphs: Vec<Vec<String>> = vec![Vec::new()];
    for attr in &input.attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        if let Meta::NameValue(meta) = &attr.meta
            && let Expr::Lit(expr) = &meta.value
            && let Lit::Str(lit) = &expr.lit
        {
            let line = lit.value().trim().to_string();
            if line.is_empty() {
                paragraphs.push(Vec::new());
            } else if let Some(current) = paragraphs.last_mut() {
                current.push(line);
            }
        }
    }

    let description = paragraphs
        .into_iter()
        .filter(|lines| !lines.is_empty())
        .map(|lines| lines.join(" "))
        .collect::<Vec<_>>()
        .join("\n\n");

    if description.is_empty() {
        return syn::Error::new_spanned(name, "ToolDescription requires a doc comment")
            .to_compile_error()
            .into();
    }

    let expanded = quote! {
        impl #impl_generics triage_domain::ToolDescription for #name #ty_generics #where_clause {
            fn description(&self) -> String {
                #description.to_string()
            }
        }
    };

    expanded.into()
}
