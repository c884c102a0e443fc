//! Fixed naming and generator conventions shared by both pipelines.
//!
//! Nothing here is user-extensible: the generator option tables are the
//! documented defaults every generated module is built with.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Group label attached to every produced step.
pub const TASK_GROUP: &str = "openapi generation";
/// Id of the umbrella step that depends on every generate step.
pub const GENERATE_ALL_TASK: &str = "generateAllCode";
/// Config file looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "openapi-generator.json";
/// Aggregator module excluded from default internal discovery.
pub const AGGREGATOR_MODULE: &str = "all";
/// Root namespace of synthesized base packages.
pub const ROOT_NAMESPACE: &str = "io.github.javenue";
/// Output root relative to the project when `outputDir` is not configured.
pub const DEFAULT_OUTPUT_REL: &str = "build/generated/openapi";
/// Resources directory relative to a module.
pub const RESOURCES_REL: &str = "src/main/resources";
/// Name of the internal entry in the single-spec pipeline.
pub const SINGLE_INTERNAL_ENTRY: &str = "internal";

/// Spec file name scanned for by the client pipeline.
pub const CLIENT_SPEC_FILE: &str = "openapi-spec.yaml";
/// Module directory holding a service's spec resources.
pub const OPENAPI_MODULE: &str = "openapi";

/// Spec file name scanned for by the server pipeline.
pub const SERVER_SPEC_FILE: &str = "openapi.yaml";
/// Sibling module holding the server pipeline's specs.
pub const DOC_MODULE: &str = "doc";
/// Spec directory inside the doc module.
pub const DOC_SPEC_REL: &str = "src/main/openapi";
/// Default internal spec path, relative to the doc spec directory.
pub const DEFAULT_SERVER_INTERNAL_SPEC: &str = "internal/openapi.yaml";
/// Source root below the output root registered for compilation.
pub const JAVA_SOURCE_REL: &str = "src/main/java";
/// Compile step that consumes the server pipeline's generated sources.
pub const JAVA_COMPILE_TASK: &str = "compileJava";

/// Which generation pipeline a project uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Pipeline {
    /// One TypeScript client per internal service and per external API.
    #[default]
    Client,
    /// Spring server interfaces plus Java clients from a single internal spec.
    Server,
}

impl Pipeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pipeline::Client => "client",
            Pipeline::Server => "server",
        }
    }

    /// Spec file name picked up by the external scan.
    pub fn spec_file_name(&self) -> &'static str {
        match self {
            Pipeline::Client => CLIENT_SPEC_FILE,
            Pipeline::Server => SERVER_SPEC_FILE,
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generator names passed to the external tool.
pub mod generators {
    pub const TYPESCRIPT_AXIOS: &str = "typescript-axios";
    pub const SPRING: &str = "spring";
    pub const JAVA: &str = "java";
}

fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Options for every validate step.
pub fn validate_options() -> BTreeMap<String, String> {
    string_map(&[("recommend", "true")])
}

/// Config options for the Spring server generate step.
pub fn server_config_options() -> BTreeMap<String, String> {
    string_map(&[
        ("useTags", "true"),
        ("useSpringBoot3", "true"),
        ("interfaceOnly", "true"),
        ("requestMappingMode", "api_interface"),
        ("dateLibrary", "java8"),
        ("annotationLibrary", "none"),
        ("documentationProvider", "none"),
    ])
}

/// Config options for Java client generate steps, internal and external.
pub fn java_client_config_options() -> BTreeMap<String, String> {
    string_map(&[
        ("useTags", "true"),
        ("useJakartaEe", "true"),
        ("library", "resttemplate"),
        ("dateLibrary", "java8"),
        ("documentationProvider", "none"),
    ])
}

/// Type mappings for the TypeScript client.
///
/// Narrows arbitrary-precision decimals to `number`.
pub fn typescript_type_mappings() -> BTreeMap<String, String> {
    string_map(&[("Decimal", "number")])
}

/// Type mappings for the Spring server and Java clients.
///
/// Narrows arbitrary-precision decimals to `Double` and drops the offset of
/// zoned timestamps.
pub fn java_type_mappings() -> BTreeMap<String, String> {
    string_map(&[
        ("Decimal", "Double"),
        ("OffsetDateTime", "java.time.LocalDateTime"),
    ])
}

/// Global properties for Spring/Java generate steps: all apis, models and
/// supporting files, without docs or tests.
pub fn java_global_properties() -> BTreeMap<String, String> {
    string_map(&[
        ("apis", ""),
        ("apiDocs", "false"),
        ("apiTests", "false"),
        ("models", ""),
        ("modelDocs", "false"),
        ("modelTests", "false"),
        ("supportingFiles", ""),
    ])
}
