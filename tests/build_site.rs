//! End-to-end build tests over a real site tree.

use smelt::{build::build_site, config::SiteConfig};
use std::{fs, path::Path};

const CONFIG: &str = r#"
    [site]
    name = "Fixture"

    [build]
    default_layout = "page.html"

    [collections.publications]
    pattern = "*/**/*.md"
    sort_by = "date"
    reverse = true
    name = "Everything"
"#;

const PAGE_LAYOUT: &str = "{{ page.contents | safe }}";

const LIST_LAYOUT: &str =
    "{% for post in collections.publications %}{{ post.title }};{% endfor %}";

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Canonicalized tempdir root, so config paths and assertions agree.
fn root_of(tmp: &tempfile::TempDir) -> std::path::PathBuf {
    tmp.path().canonicalize().unwrap()
}

/// Build a leaked config anchored at `root`.
fn config_at(root: &Path) -> &'static SiteConfig {
    let mut config = SiteConfig::from_str(CONFIG).unwrap();
    config.finalize_paths(root, Path::new("smelt.toml"));
    Box::leak(Box::new(config))
}

fn write_templates(root: &Path) {
    write(&root.join("templates/page.html"), PAGE_LAYOUT);
    write(&root.join("templates/list.html"), LIST_LAYOUT);
}

#[test]
fn publications_are_reverse_chronological() {
    let tmp = tempfile::tempdir().unwrap();
    let root = &root_of(&tmp);
    write_templates(root);

    write(
        &root.join("content/essays/one.md"),
        "---\ntitle: One\ndate: 2021-01-01\n---\nbody",
    );
    write(
        &root.join("content/essays/two.md"),
        "---\ntitle: Two\ndate: 2021-06-01\n---\nbody",
    );
    write(
        &root.join("content/reviews/three.md"),
        "---\ntitle: Three\ndate: 2020-01-01\n---\nbody",
    );
    write(
        &root.join("content/index.md"),
        "---\ntitle: Home\nlayout: list.html\n---\nignored",
    );

    build_site(config_at(root)).unwrap();

    // [2021-06-01, 2021-01-01, 2020-01-01]
    let listing = fs::read_to_string(root.join("public/index.html")).unwrap();
    assert_eq!(listing, "Two;One;Three;");
}

#[test]
fn draft_is_absent_from_output() {
    let tmp = tempfile::tempdir().unwrap();
    let root = &root_of(&tmp);
    write_templates(root);

    write(
        &root.join("content/essays/published.md"),
        "---\ntitle: Published\ndate: 2021-01-01\n---\nbody",
    );
    write(
        &root.join("content/essays/secret.md"),
        "---\ntitle: Secret\ndate: 2021-02-01\ndraft: true\n---\nbody",
    );

    build_site(config_at(root)).unwrap();

    // Present in the source tree...
    assert!(root.join("content/essays/secret.md").exists());
    // ...absent from the destination tree
    assert!(root.join("public/essays/published/index.html").exists());
    assert!(!root.join("public/essays/secret").exists());

    // And absent from collection listings too
    write(
        &root.join("content/index.md"),
        "---\nlayout: list.html\n---\nignored",
    );
    build_site(config_at(root)).unwrap();
    let listing = fs::read_to_string(root.join("public/index.html")).unwrap();
    assert!(!listing.contains("Secret"));
}

#[test]
fn drafts_flag_includes_drafts() {
    let tmp = tempfile::tempdir().unwrap();
    let root = &root_of(&tmp);
    write_templates(root);

    write(
        &root.join("content/essays/secret.md"),
        "---\ntitle: Secret\ndraft: true\n---\nbody",
    );

    let mut config = SiteConfig::from_str(CONFIG).unwrap();
    config.build.drafts = true;
    config.finalize_paths(root, Path::new("smelt.toml"));
    build_site(Box::leak(Box::new(config))).unwrap();

    assert!(root.join("public/essays/secret/index.html").exists());
}

#[test]
fn markdown_becomes_wrapped_html_at_permalink() {
    let tmp = tempfile::tempdir().unwrap();
    let root = &root_of(&tmp);
    write_templates(root);

    write(
        &root.join("content/essays/weaving.md"),
        "---\ntitle: Weaving\ndate: 2021-06-01\n---\n# Threads\n\nA paragraph.",
    );

    build_site(config_at(root)).unwrap();

    let html = fs::read_to_string(root.join("public/essays/weaving/index.html")).unwrap();
    assert!(html.contains("<h1>Threads</h1>"));
    assert!(html.contains("<p>A paragraph.</p>"));
}

#[test]
fn fenced_code_is_highlighted() {
    let tmp = tempfile::tempdir().unwrap();
    let root = &root_of(&tmp);
    write_templates(root);

    write(
        &root.join("content/essays/code.md"),
        "---\ntitle: Code\n---\n```rust\nfn main() {}\n```\n",
    );

    build_site(config_at(root)).unwrap();

    let html = fs::read_to_string(root.join("public/essays/code/index.html")).unwrap();
    // syntect emits inline-styled <pre> blocks
    assert!(html.contains("<pre"));
    assert!(html.contains("main"));
    assert!(!html.contains("```"));
}

#[test]
fn non_markdown_files_pass_through() {
    let tmp = tempfile::tempdir().unwrap();
    let root = &root_of(&tmp);
    write_templates(root);

    write(&root.join("content/css/style.css"), "body { margin: 0 }");
    write(
        &root.join("content/index.md"),
        "---\ntitle: Home\n---\nbody",
    );

    build_site(config_at(root)).unwrap();

    let css = fs::read_to_string(root.join("public/css/style.css")).unwrap();
    assert_eq!(css, "body { margin: 0 }");
}

#[test]
fn build_fails_on_bad_front_matter() {
    let tmp = tempfile::tempdir().unwrap();
    let root = &root_of(&tmp);
    write_templates(root);

    write(
        &root.join("content/broken.md"),
        "---\ntitle: [unclosed\n---\nbody",
    );

    assert!(build_site(config_at(root)).is_err());
}

#[test]
fn build_fails_on_missing_layout() {
    let tmp = tempfile::tempdir().unwrap();
    let root = &root_of(&tmp);
    write_templates(root);

    write(
        &root.join("content/index.md"),
        "---\nlayout: missing.html\n---\nbody",
    );

    assert!(build_site(config_at(root)).is_err());
}
