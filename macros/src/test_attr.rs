// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2025 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use darling::FromMeta;
use darling_core::Error;
use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote, quote_spanned};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{FnArg, ItemFn, ReturnType};
use uuid::Uuid;

#[derive(Debug, FromMeta)]
pub(crate) struct MacroArgs {
    flavor: Option<String>,
    worker_threads: Option<usize>,
    bucket_name: Option<String>,
    no_bucket: darling::util::Flag,
    object_lock: darling::util::Flag,
    no_cleanup: darling::util::Flag,
    skip_if_insecure: darling::util::Flag,
}

impl MacroArgs {
    pub(crate) fn validate(&self, func: &ItemFn) -> Result<(), Error> {
        let no_bucket = self.no_bucket.is_present();
        if no_bucket {
            for (present, name) in [
                (self.bucket_name.is_some(), "bucket_name"),
                (self.object_lock.is_present(), "object_lock"),
                (self.no_cleanup.is_present(), "no_cleanup"),
            ] {
                if present {
                    return Err(Error::custom(format!(
                        "The `no_bucket` argument cannot be used with `{name}`"
                    ))
                    .with_span(&func.sig.span()));
                }
            }
        }

        let expected: &[&str] = match no_bucket {
            true => &["TestContext"],
            false => &["TestContext", "String"],
        };
        if func.sig.inputs.len() != expected.len() {
            let error_msg = match no_bucket {
                true => "When using `no_bucket`, the test function must have exactly one argument: (ctx: TestContext)",
                false => "Test function must have exactly two arguments: (ctx: TestContext, bucket_name: String)",
            };
            return Err(Error::custom(error_msg).with_span(&func.sig.inputs.span()));
        }

        for (arg, type_name) in func.sig.inputs.iter().zip(expected) {
            let FnArg::Typed(pat_type) = arg else {
                return Err(Error::custom("Test function cannot take `self`").with_span(&arg.span()));
            };
            if !pat_type.ty.to_token_stream().to_string().contains(type_name) {
                return Err(
                    Error::custom(format!("Argument must be of type {type_name}"))
                        .with_span(&pat_type.span()),
                );
            }
        }

        Ok(())
    }
}

/// Expands the test macro into the final TokenStream
pub(crate) fn expand_test_macro(args: MacroArgs, mut func: ItemFn) -> TokenStream {
    let input_span = func.sig.paren_token.span.span();
    func.sig.output = ReturnType::Default;
    let old_inps = func.sig.inputs.clone();
    func.sig.inputs = Punctuated::default();
    let sig = func.sig.clone().into_token_stream();

    let header = generate_tokio_test_header(&args, sig);

    let test_function_block = func.block.clone().into_token_stream();
    let inner_inputs = quote_spanned!(input_span=> #old_inps);
    let inner_fn_name = create_inner_func_name(&func);
    let inner_header = quote_spanned!(func.sig.span()=> async fn #inner_fn_name(#inner_inputs));

    let prelude = quote!(
        use ::futures_util::FutureExt;
        use ::minio_fixtures::s3::store::ObjectStore;
        use ::std::panic::AssertUnwindSafe;

        let ctx = ::minio_fixtures_common::test_context::TestContext::new_from_env();
    );
    let maybe_skip = generate_insecure_skip_logic(&args, func.sig.span());

    let outer_body = match args.no_bucket.is_present() {
        true => quote_spanned!(func.block.span()=> {
            #prelude
            #maybe_skip
            #inner_fn_name(ctx).await;
        }),
        false => generate_with_bucket_body(
            prelude,
            maybe_skip,
            &inner_fn_name,
            &args,
            func.block.span(),
        ),
    };

    let inner_impl = quote_spanned!(func.span()=>
        #inner_header
        #test_function_block
    );

    let mut out = TokenStream::new();
    out.extend(header);
    out.extend(outer_body);
    out.extend(inner_impl);
    out
}

fn generate_tokio_test_header(args: &MacroArgs, sig: TokenStream) -> TokenStream {
    let flavor = args
        .flavor
        .clone()
        .or(std::env::var("MINIO_TEST_TOKIO_RUNTIME_FLAVOR").ok());
    let mut params = Vec::new();
    if let Some(flavor) = flavor {
        params.push(quote!(flavor = #flavor));
    }
    if let Some(worker_threads) = args.worker_threads {
        params.push(quote!(worker_threads = #worker_threads));
    }
    let attr = match params.is_empty() {
        true => quote!(#[::tokio::test]),
        false => quote!(#[::tokio::test(#(#params),*)]),
    };
    quote!(
        #attr
        #sig
    )
}

fn generate_insecure_skip_logic(args: &MacroArgs, span: Span) -> TokenStream {
    if !args.skip_if_insecure.is_present() {
        return TokenStream::new();
    }
    quote_spanned!(span=>
        if !ctx.store.is_secure() {
            println!("Skipping test because the store is not reached over TLS");
            return;
        }
    )
}

fn generate_with_bucket_body(
    prelude: TokenStream,
    maybe_skip: TokenStream,
    inner_fn_name: &TokenStream,
    args: &MacroArgs,
    span: Span,
) -> TokenStream {
    let bucket_name = args
        .bucket_name
        .as_ref()
        .map(|b| b.to_token_stream())
        .unwrap_or_else(|| {
            let random_name = format!("test-bucket-{}", Uuid::new_v4());
            proc_macro2::Literal::string(&random_name).into_token_stream()
        });
    let object_lock = args.object_lock.is_present();
    let maybe_cleanup = match args.no_cleanup.is_present() {
        true => TokenStream::new(),
        false => quote! {
            ::minio_fixtures_common::cleanup_guard::cleanup(store.as_ref(), &resp.bucket).await;
        },
    };
    quote_spanned!(span=> {
        #prelude
        #maybe_skip

        let store = ctx.store.clone();
        let bucket_name = #bucket_name;
        let resp = store.create_bucket(bucket_name, #object_lock).await.expect("Failed to create bucket");
        assert_eq!(resp.bucket, bucket_name);
        let res = AssertUnwindSafe(#inner_fn_name(ctx, resp.bucket.clone())).catch_unwind().await;
        #maybe_cleanup
        if let Err(e) = res {
            ::std::panic::resume_unwind(e);
        }
    })
}

fn create_inner_func_name(func: &ItemFn) -> TokenStream {
    let inner_name = format!("{}_test_impl", func.sig.ident);
    let ident = proc_macro2::Ident::new(&inner_name, func.sig.span());
    quote! { #ident }
}
