//! Default configuration values

/// Project configuration file name
pub const CONFIG_FILE_NAME: &str = "linfra.toml";

/// Manifest file expected in every package folder
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Default packages folder, relative to the project root
pub const DEFAULT_PACKAGES_FOLDER: &str = "packages";

/// Default repository root, relative to the project root
pub const DEFAULT_ROOT_FOLDER: &str = ".";

/// Folder inside each module that receives dependency copies
pub const DEFAULT_DEPS_FOLDER: &str = "node_modules";

/// Command that links a repository's packages together
pub const DEFAULT_BOOTSTRAP_COMMAND: &str = "npx lerna bootstrap";

/// Command that builds a single package
pub const DEFAULT_BUILD_COMMAND: &str = "npm run dev:build";

/// Command that rebuilds a package on change
pub const DEFAULT_WATCH_COMMAND: &str = "npm run dev:watch";

/// Prefix for container image tags
pub const DEFAULT_IMAGE_PREFIX: &str = "app";

/// Container build file looked up in every module
pub const DEFAULT_DOCKERFILE: &str = "Dockerfile";

/// Compose CLI used to drive compose files
pub const DEFAULT_COMPOSE_COMMAND: &str = "docker-compose";

/// Base compose file looked up in every module
pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yml";

/// Compose variant with dependency volumes
pub const DEFAULT_COMPOSE_DEPS_FILE: &str = "docker-compose.deps.yml";

/// Compose variant running the build command
pub const DEFAULT_COMPOSE_BUILD_FILE: &str = "docker-compose.build.yml";

/// Compose variant running the watch command
pub const DEFAULT_COMPOSE_WATCH_FILE: &str = "docker-compose.watch.yml";

/// Default concurrency for every phase
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
