use proc_macro2::TokenStream;
use quote::{quote, quote_spanned, ToTokens};
use syn::spanned::Spanned;
use syn::{ImplItem, ItemImpl, LitStr, Type};

pub fn impl_members(scope_name: Option<LitStr>, input: ItemImpl) -> TokenStream {
    if let Some((_, path, _)) = &input.trait_ {
        let error = quote_spanned!(
            path.span() => compile_error!("cannot declare the members of a trait implementation");
        );
        return quote!(#input #error);
    }

    let scope_name = match scope_name {
        Some(name) => name.value(),
        None => type_name(&input.self_ty),
    };

    let mut declarations = Vec::new();
    for item in &input.items {
        match item {
            ImplItem::Fn(f) => {
                let name = f.sig.ident.to_string();
                let kind = if f.sig.receiver().is_some() {
                    quote!(Instance)
                } else {
                    quote!(Scope)
                };
                declarations.push(quote! {
                    declarer.declare_member(#name, docnotes::MemberKind::#kind);
                });
            }
            ImplItem::Const(c) => {
                let name = c.ident.to_string();
                declarations.push(quote! {
                    declarer.declare_constant(#name);
                });
            }
            _ => {}
        }
    }

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    quote! {
        #input

        impl #impl_generics docnotes::Members for #self_ty #where_clause {
            const SCOPE_NAME: &'static str = #scope_name;

            #[allow(unused_variables)]
            fn declare_members<DocnotesDeclarer: docnotes::Declarer + ?Sized>(
                declarer: &mut DocnotesDeclarer,
            ) {
                #(#declarations)*
            }
        }
    }
}

fn type_name(ty: &Type) -> String {
    match ty {
        Type::Path(p) => match p.path.segments.last() {
            Some(segment) => segment.ident.to_string(),
            None => ty.to_token_stream().to_string(),
        },
        _ => ty.to_token_stream().to_string(),
    }
}
