//! Print the OpenAPI document as JSON, or YAML with `--yaml`.

use backend::doc::ApiDoc;
use utoipa::OpenApi;

fn main() {
    let yaml = std::env::args().any(|arg| arg == "--yaml");
    let doc = ApiDoc::openapi();
    let rendered = if yaml {
        doc.to_yaml().expect("serialize OpenAPI document")
    } else {
        doc.to_json().expect("serialize OpenAPI document")
    };
    println!("{rendered}");
}
