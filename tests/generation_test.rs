//! End-to-end tests: descriptor file in, server project out

use std::path::{Path, PathBuf};

use automcp::core::descriptor::load_descriptors;
use automcp::{Error, GeneratorOptions, ServiceName, Skeleton, TemplateInstantiator};
use tempfile::TempDir;

const TOOLS_JSON: &str = r#"[
  {
    "name": "getUser",
    "description": "Fetch a user by id",
    "method": "GET",
    "url": "https://api.example.com/users/{id}",
    "params": [
      { "name": "id", "type": "integer", "required": true, "in_path": true }
    ]
  },
  {
    "name": "findPets",
    "description": "Find pets by tag",
    "method": "GET",
    "url": "https://api.example.com/pets",
    "params": [
      { "name": "tags", "type": "string[]", "description": "Tags to filter by" }
    ],
    "bearer_auth": true,
    "headers": [{ "name": "Authorization" }]
  },
  {
    "name": "createOrder",
    "method": "POST",
    "url": "https://api.example.com/orders",
    "params": [
      { "name": "order.id", "type": "string", "required": true },
      { "name": "quantity", "type": "integer" }
    ],
    "headers": [{ "name": "X-Store-Key", "is_env": true }]
  }
]"#;

async fn write_tools(dir: &Path) -> PathBuf {
    let path = dir.join("tools.json");
    tokio::fs::write(&path, TOOLS_JSON).await.unwrap();
    path
}

async fn generate(root: &Path, skeleton: &Skeleton) -> automcp::GenerationReport {
    let tools = write_tools(root).await;
    let endpoints = load_descriptors(&tools).await.unwrap();
    let service = ServiceName::new("pet-store").unwrap();
    TemplateInstantiator::new(service, root.join("servers"))
        .instantiate(skeleton, &endpoints)
        .await
        .unwrap()
}

fn read(path: PathBuf) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_embedded_skeleton_end_to_end() {
    let temp = TempDir::new().unwrap();
    let report = generate(temp.path(), &Skeleton::Embedded).await;

    assert_eq!(report.output_dir, temp.path().join("servers/pet-store"));
    assert_eq!(report.tools, 3);
    assert!(report.files.contains(&PathBuf::from("package.json")));
    assert!(report.files.contains(&PathBuf::from("src/index.ts")));

    let manifest: serde_json::Value =
        serde_json::from_str(&read(report.output_dir.join("package.json"))).unwrap();
    assert_eq!(manifest["name"], "pet-store");

    let bootstrap = read(report.output_dir.join("src/index.ts"));
    assert!(bootstrap.contains("const NAME = \"pet-store\";"));
    assert!(bootstrap.contains("function setupServer(server: McpServer) {"));
    assert_eq!(bootstrap.matches("  server.tool(\n").count(), 3);
    assert!(!bootstrap.contains("{{NAME}}"));
    assert!(!bootstrap.contains("{{TOOLS}}"));

    let readme = read(report.output_dir.join("README.md"));
    assert!(readme.starts_with("# pet-store\n"));
    assert!(readme.contains("\"name\": \"createOrder\""));
    assert!(!readme.contains("{{TOOLS}}"));
}

#[tokio::test]
async fn test_handlers_follow_descriptor_semantics() {
    let temp = TempDir::new().unwrap();
    let report = generate(temp.path(), &Skeleton::Embedded).await;
    let bootstrap = read(report.output_dir.join("src/index.ts"));

    // Path interpolation
    assert!(bootstrap.contains("const url = `https://api.example.com/users/${id}`;"));
    assert!(!bootstrap.contains("users/{id}"));
    assert!(bootstrap.contains("id: z.number().int(),"));

    // Optional array query parameter
    assert!(
        bootstrap
            .contains("tags: z.array(z.string()).describe(\"Tags to filter by\").optional(),")
    );
    assert!(bootstrap.contains("if (tags !== undefined) params[\"tags\"] = tags.join(\",\");"));

    // Bearer auth replaces the declared Authorization header
    assert!(
        bootstrap.contains("\"Authorization\": `Bearer ${process.env[\"PET_STORE_API_KEY\"]}`,")
    );
    assert!(!bootstrap.contains("\"Authorization\": \"Authorization\""));

    // Body keys keep the original names, bindings are sanitized
    assert!(bootstrap.contains("const { order_id, quantity } = args;"));
    assert!(bootstrap.contains("\"order.id\": order_id"));
    assert!(bootstrap.contains("\"X-Store-Key\": process.env[\"X-STORE-KEY\"],"));
    assert!(bootstrap.contains("method: \"POST\","));
}

#[tokio::test]
async fn test_regeneration_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    let first = generate(temp.path(), &Skeleton::Embedded).await;
    let before: Vec<Vec<u8>> = first
        .files
        .iter()
        .map(|f| std::fs::read(first.output_dir.join(f)).unwrap())
        .collect();

    let second = generate(temp.path(), &Skeleton::Embedded).await;
    let after: Vec<Vec<u8>> = second
        .files
        .iter()
        .map(|f| std::fs::read(second.output_dir.join(f)).unwrap())
        .collect();

    assert_eq!(first.files, second.files);
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_custom_skeleton_directory() {
    let temp = TempDir::new().unwrap();
    let skeleton = temp.path().join("skeleton");
    std::fs::create_dir_all(skeleton.join("src/nested")).unwrap();
    std::fs::write(skeleton.join("package.json"), "{\"name\": \"{{NAME}}\"}").unwrap();
    std::fs::write(skeleton.join("src/index.ts"), "{{TOOLS}}").unwrap();
    std::fs::write(skeleton.join("src/nested/NOTES.txt"), "{{NAME}}: {{TOOLS}}").unwrap();

    let report = generate(temp.path(), &Skeleton::Directory(skeleton)).await;

    assert_eq!(
        report.files,
        vec![
            PathBuf::from("package.json"),
            PathBuf::from("src/index.ts"),
            PathBuf::from("src/nested/NOTES.txt"),
        ]
    );
    let notes = read(report.output_dir.join("src/nested/NOTES.txt"));
    assert!(notes.starts_with("pet-store: [\n  {\n    \"name\": \"getUser\","));
    let bootstrap = read(report.output_dir.join("src/index.ts"));
    assert!(bootstrap.starts_with("function setupServer(server: McpServer) {"));
}

#[tokio::test]
async fn test_missing_skeleton_is_reported_before_any_write() {
    let temp = TempDir::new().unwrap();
    let tools = write_tools(temp.path()).await;
    let endpoints = load_descriptors(&tools).await.unwrap();
    let missing = temp.path().join("does-not-exist");

    let err = TemplateInstantiator::new(ServiceName::new("pet-store").unwrap(), temp.path().join("servers"))
        .instantiate(&Skeleton::Directory(missing.clone()), &endpoints)
        .await
        .unwrap_err();

    match err {
        Error::TemplateMissing { path } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!temp.path().join("servers").exists());
}

#[tokio::test]
async fn test_duplicate_names_rejected_on_request() {
    let temp = TempDir::new().unwrap();
    let tools = write_tools(temp.path()).await;
    let mut endpoints = load_descriptors(&tools).await.unwrap();
    endpoints.push(endpoints[0].clone());

    let err = TemplateInstantiator::new(ServiceName::new("pet-store").unwrap(), temp.path().join("servers"))
        .with_options(GeneratorOptions {
            reject_duplicate_names: true,
        })
        .instantiate(&Skeleton::Embedded, &endpoints)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DuplicateEndpoint(name) if name == "getUser"));
}
