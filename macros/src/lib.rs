mod test_attr;

use darling::ast::NestedMeta;
use darling::{Error, FromMeta};
use syn::ItemFn;

extern crate proc_macro;

/// A proc macro attribute for writing object store tests.
///
/// Wraps `#[tokio::test]`: a `TestContext` is built from the environment, a
/// bucket is created in its store before the body runs and purged afterwards,
/// even when the body panics.
///
/// By default the test function takes two parameters:
///
/// - `ctx: TestContext` - The test context, holding the store and the configuration.
/// - `bucket_name: String` - The name of the bucket created for the test.
///
/// ```no_run
/// use minio_fixtures_common::test_context::TestContext;
/// #[minio_fixtures_macros::test]
/// async fn my_test(ctx: TestContext, bucket_name: String) {
///    // Your test code here
/// }
/// ```
///
/// With `no_bucket` the function takes only `ctx: TestContext`.
///
/// Other arguments:
///
/// - `flavor` / `worker_threads`: forwarded to `#[tokio::test]`. Without
///   `flavor`, `MINIO_TEST_TOKIO_RUNTIME_FLAVOR` is used when set.
/// - `bucket_name`: fixed bucket name instead of a random `test-bucket-<uuid>`.
/// - `object_lock`: create the bucket with object lock (and versioning).
/// - `no_cleanup`: leave the bucket in place.
/// - `skip_if_insecure`: skip the test when the store is not reached over TLS,
///   e.g. for SSE-C and SSE-KMS uploads.
/// ```no_run
/// use minio_fixtures_common::test_context::TestContext;
/// #[minio_fixtures_macros::test(skip_if_insecure, object_lock)]
/// async fn my_test(ctx: TestContext, bucket_name: String) {
///    // this test only runs against a secure store
/// }
/// ```
#[proc_macro_attribute]
pub fn test(
    args: proc_macro::TokenStream,
    input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let input_fn = match syn::parse::<ItemFn>(input) {
        Ok(input_fn) => input_fn,
        Err(err) => return err.to_compile_error().into(),
    };

    let attr_args = match NestedMeta::parse_meta_list(args.into()) {
        Ok(v) => v,
        Err(e) => return Error::from(e).write_errors().into(),
    };

    let args = match test_attr::MacroArgs::from_list(&attr_args) {
        Ok(v) => v,
        Err(e) => return e.write_errors().into(),
    };

    if let Err(err) = args.validate(&input_fn) {
        return err.write_errors().into();
    }

    test_attr::expand_test_macro(args, input_fn).into()
}
