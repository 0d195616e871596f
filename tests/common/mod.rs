#![allow(dead_code)]

use assert_fs::TempDir;
use assert_fs::prelude::*;

use deploycfg::defaults::{DEFAULT_PIPELINE, DEFAULT_TEMPLATE};
use deploycfg::source::MapSource;

pub const MANIFEST: &str = r#"name: Deploy to Firebase Hosting

on:
  push:
    branches: [main]
  workflow_dispatch:

env:
  NODE_VERSION: "20"

jobs:
  validate-secrets:
    runs-on: ubuntu-latest
    steps:
      - run: deploycfg check-env
  generate-config:
    needs: validate-secrets
    runs-on: ubuntu-latest
    env:
      FIREBASE_API_KEY: ${{ secrets.FIREBASE_API_KEY }}
    steps:
      - run: deploycfg generate
  deploy:
    needs: generate-config
    runs-on: ubuntu-latest
    steps:
      - run: deploycfg verify
"#;

pub const VALUES: [(&str, &str); 8] = [
    ("FIREBASE_API_KEY", "AIzaSyD-exampleexampleexample"),
    ("FIREBASE_AUTH_DOMAIN", "demo-app.firebaseapp.com"),
    ("FIREBASE_DATABASE_URL", "https://demo-app.firebaseio.com"),
    ("FIREBASE_PROJECT_ID", "demo-app"),
    ("FIREBASE_STORAGE_BUCKET", "demo-app.appspot.com"),
    ("FIREBASE_MESSAGING_SENDER_ID", "123456789012"),
    ("FIREBASE_APP_ID", "1:123456789012:web:abc123def456"),
    ("FIREBASE_MEASUREMENT_ID", "G-ABC123XYZ9"),
];

/// Deployment root with everything except the generated artifact
pub fn deployment_tree() -> TempDir {
    deployment_tree_with_manifest(MANIFEST)
}

pub fn deployment_tree_with_manifest(manifest: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    temp.child("index.html")
        .write_str("<!doctype html><script src=\"firebase-config.js\"></script>")
        .unwrap();
    temp.child("firebase-config.template.js")
        .write_str(DEFAULT_TEMPLATE)
        .unwrap();
    temp.child("js/app.js").write_str("console.log('app');").unwrap();
    temp.child("css/style.css").write_str("body {}").unwrap();
    temp.child(".github/workflows/deploy.yml")
        .write_str(manifest)
        .unwrap();
    temp
}

pub fn all_values() -> MapSource {
    VALUES.into_iter().collect()
}

pub fn required_names() -> Vec<String> {
    DEFAULT_PIPELINE
        .required_values
        .iter()
        .map(|spec| spec.name.clone())
        .collect()
}
