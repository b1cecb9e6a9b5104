//! Declarative schema for the provider and its data source.

use serde::Serialize;
use std::collections::BTreeMap;

const DESCRIPTION_PREFIX: &str =
    "Uses esbuild to package a Lambda function and make it ready for";

const EXAMPLE_USAGE: &str = r#"## Example Usage

```terraform
data "lambdapackager_package" "my_function" {
  args = [
    "--bundle",
    # Provided by the Node.js 18 runtime
    "--external:@aws-sdk*",
    "--minify",
    "--platform=node",
    "--target=es2021",
    "--sourcemap=inline",
  ]

  entrypoint        = "../lambda/src/handlers/user-deleted-listener/index.ts"
  working_directory = "../lambda"
}

resource "aws_lambda_function" "my_function" {
  function_name    = "my-function"
  role             = aws_iam_role.this.arn
  handler          = "index.handler"
  runtime          = "nodejs18.x"
  filename         = data.lambdapackager_package.my_function.filename
  source_code_hash = data.lambdapackager_package.my_function.source_code_hash
}
```
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    ListOfString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub description: &'static str,
}

impl Attribute {
    pub fn required(kind: AttributeType, description: &'static str) -> Self {
        Self {
            kind,
            required: true,
            optional: false,
            computed: false,
            description,
        }
    }

    pub fn optional(kind: AttributeType, description: &'static str) -> Self {
        Self {
            kind,
            required: false,
            optional: true,
            computed: false,
            description,
        }
    }

    pub fn computed(kind: AttributeType, description: &'static str) -> Self {
        Self {
            kind,
            required: false,
            optional: false,
            computed: true,
            description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub markdown_description: String,
    pub attributes: BTreeMap<&'static str, Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub data_sources: BTreeMap<String, Schema>,
}

/// Schema of the provider block itself.
pub fn provider_schema() -> Schema {
    Schema {
        description: "Packages Node.js Lambda functions with esbuild.".to_string(),
        markdown_description: String::new(),
        attributes: BTreeMap::from([(
            "esbuild_binary",
            Attribute::optional(
                AttributeType::String,
                "Path to the esbuild executable. Defaults to LAMBDA_PACKAGER_ESBUILD_BINARY, then esbuild on PATH.",
            ),
        )]),
    }
}

/// Schema of the `<provider>_package` data source.
pub fn package_schema() -> Schema {
    Schema {
        description: format!("{DESCRIPTION_PREFIX} AWS."),
        markdown_description: format!(
            "{DESCRIPTION_PREFIX} [aws_lambda_function](https://registry.terraform.io/providers/hashicorp/aws/latest/docs/resources/lambda_function).\n\n{EXAMPLE_USAGE}"
        ),
        attributes: BTreeMap::from([
            (
                "args",
                Attribute::required(AttributeType::ListOfString, "Arguments to pass to esbuild."),
            ),
            (
                "entrypoint",
                Attribute::required(AttributeType::String, "Path to lambda function entrypoint."),
            ),
            (
                "working_directory",
                Attribute::required(
                    AttributeType::String,
                    "Typically the folder containing the package.json at the root of your Lambda project.",
                ),
            ),
            (
                "filename",
                Attribute::computed(AttributeType::String, "Path to the packaged lambda zip."),
            ),
            (
                "source_code_hash",
                Attribute::computed(
                    AttributeType::String,
                    "Source code hash of the built package.",
                ),
            ),
        ]),
    }
}
