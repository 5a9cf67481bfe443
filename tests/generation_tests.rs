mod common;

use common::*;
use onepager::core::dispatch::{ARCHIVE_CONTENT_TYPE, PRESENTATION_CONTENT_TYPE};
use onepager::{
    GenerationMode, GenerationRequest, GeneratorSettings, OnePagerEngine, OnePagerError,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn engine(
    source: &InMemorySource,
    settings: GeneratorSettings,
) -> OnePagerEngine<InMemorySource, InMemorySource, InMemorySource> {
    OnePagerEngine::new(source.clone(), source.clone(), source.clone(), settings)
}

fn request(ids: &[&str], mode: GenerationMode) -> GenerationRequest {
    GenerationRequest::new(ids.iter().map(|s| s.to_string()).collect(), mode).unwrap()
}

#[tokio::test]
async fn test_single_internal_document_with_avatar() {
    let avatar = b"fresh avatar png".to_vec();
    let source = InMemorySource::new(build_template())
        .with_profile(sample_profile("E1", 2, 3, true))
        .with_avatar("E1", &avatar);

    let result = engine(&source, GeneratorSettings::default())
        .generate(&request(&["E1"], GenerationMode::Internal))
        .await
        .unwrap();

    assert_eq!(result.document_count, 1);
    assert_eq!(result.filename, "OP_E1.pptx");
    assert_eq!(result.content_type, PRESENTATION_CONTENT_TYPE);

    // 頭像被替換
    assert_eq!(zip_entry(&result.bytes, "ppt/media/image1.png"), avatar);

    let slide = zip_text(&result.bytes, "ppt/slides/slide1.xml");
    assert!(slide.contains("<a:t>Employee E1</a:t>"));
    assert!(slide.contains("<a:t>2020 Cert 0</a:t><a:t>2021 Cert 1</a:t>"));
    assert!(slide.contains("<a:t>Role 0|Industry 0|Project 0</a:t>"));
    assert!(slide.contains("<a:t>Role 1|Industry 1|Project 1</a:t>"));
    assert!(slide.contains("<a:t>Role 2|Industry 2|Project 2</a:t>"));
    // 第四個專案不存在，token 保留
    assert!(slide.contains("<a:t>{projectRole3}|{projectIndustry3}|{projectName3}</a:t>"));

    let slide_two = zip_text(&result.bytes, "ppt/slides/slide2.xml");
    assert!(slide_two.contains("Languages: English, French"));
    assert!(slide_two.contains("Skills: Rust\nSQL"));

    // 非投影片部分原封不動
    assert_eq!(
        zip_text(&result.bytes, "docProps/app.xml"),
        "<Properties>{fullName}</Properties>"
    );
}

#[tokio::test]
async fn test_external_batch_is_anonymized_bundle() {
    let source = InMemorySource::new(build_template())
        .with_profile(sample_profile("E1", 1, 1, true))
        .with_profile(sample_profile("E2", 0, 4, true))
        .with_avatar("E1", b"avatar one")
        .with_avatar("E2", b"avatar two");

    let result = engine(&source, GeneratorSettings::default())
        .generate(&request(&["E1", "E2"], GenerationMode::External))
        .await
        .unwrap();

    assert_eq!(result.content_type, ARCHIVE_CONTENT_TYPE);
    assert_eq!(result.filename, "OnePagers.zip");
    assert_eq!(result.document_count, 2);

    let entries = zip_entries(&result.bytes);
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["OP_E1.pptx", "OP_E2.pptx"]);

    for (_, document) in &entries {
        let slide = zip_text(document, "ppt/slides/slide1.xml");
        assert!(slide.contains("<a:t>Anonymous</a:t>"));
        assert!(!slide.contains("Employee E"));
        assert_eq!(zip_entry(document, "ppt/media/image1.png"), TEMPLATE_AVATAR);
    }
    assert_eq!(source.avatar_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_employee_aborts_batch() {
    let source = InMemorySource::new(build_template())
        .with_profile(sample_profile("E1", 1, 1, false));

    let err = engine(&source, GeneratorSettings::default())
        .generate(&request(&["E1", "E9"], GenerationMode::Internal))
        .await
        .unwrap_err();

    assert!(matches!(err, OnePagerError::NotFoundError { .. }));
    assert!(err.to_string().contains("E9"));
}

#[tokio::test]
async fn test_single_unknown_employee() {
    let source = InMemorySource::new(build_template());

    let err = engine(&source, GeneratorSettings::default())
        .generate(&request(&["E9"], GenerationMode::Internal))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("E9"));
    assert!(err.is_caller_error());
}

#[tokio::test]
async fn test_bundle_follows_request_order() {
    let mut source = InMemorySource::new(build_template());
    for id in ["A", "B", "C", "D"] {
        source = source.with_profile(sample_profile(id, 0, 0, false));
    }

    let result = engine(&source, GeneratorSettings::default())
        .generate(&request(&["C", "A", "D", "B"], GenerationMode::Internal))
        .await
        .unwrap();

    let entries = zip_entries(&result.bytes);
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["OP_C.pptx", "OP_A.pptx", "OP_D.pptx", "OP_B.pptx"]);

    for (name, document) in &entries {
        let id = name.trim_start_matches("OP_").trim_end_matches(".pptx");
        let slide = zip_text(document, "ppt/slides/slide1.xml");
        assert!(slide.contains(&format!("<a:t>Employee {}</a:t>", id)));
    }
}

#[tokio::test]
async fn test_rendering_is_deterministic() {
    let source = InMemorySource::new(build_template())
        .with_profile(sample_profile("E1", 2, 2, false));
    let engine = engine(&source, GeneratorSettings::default());
    let req = request(&["E1"], GenerationMode::Internal);

    let first = engine.generate(&req).await.unwrap();
    let second = engine.generate(&req).await.unwrap();
    assert_eq!(zip_entries(&first.bytes), zip_entries(&second.bytes));
}

#[tokio::test]
async fn test_template_parsed_once_when_cached() {
    let source = InMemorySource::new(build_template())
        .with_profile(sample_profile("E1", 0, 0, false));

    let cached = engine(&source, GeneratorSettings::default());
    let req = request(&["E1"], GenerationMode::Internal);
    cached.generate(&req).await.unwrap();
    cached.generate(&req).await.unwrap();
    assert_eq!(source.template_loads.load(Ordering::SeqCst), 1);

    let uncached_source = InMemorySource::new(build_template())
        .with_profile(sample_profile("E1", 0, 0, false));
    let uncached = engine(
        &uncached_source,
        GeneratorSettings {
            cache_template: false,
            ..GeneratorSettings::default()
        },
    );
    uncached.generate(&req).await.unwrap();
    uncached.generate(&req).await.unwrap();
    assert_eq!(uncached_source.template_loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_missing_avatar_file_keeps_template_image() {
    let source = InMemorySource::new(build_template())
        .with_profile(sample_profile("E1", 0, 0, true));

    let result = engine(&source, GeneratorSettings::default())
        .generate(&request(&["E1"], GenerationMode::Internal))
        .await
        .unwrap();

    assert_eq!(zip_entry(&result.bytes, "ppt/media/image1.png"), TEMPLATE_AVATAR);
    assert_eq!(source.avatar_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_profile_without_avatar_flag_skips_lookup() {
    let source = InMemorySource::new(build_template())
        .with_profile(sample_profile("E1", 0, 0, false))
        .with_avatar("E1", b"unused");

    engine(&source, GeneratorSettings::default())
        .generate(&request(&["E1"], GenerationMode::Internal))
        .await
        .unwrap();
    assert_eq!(source.avatar_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_oversized_avatar_rejected() {
    let source = InMemorySource::new(build_template())
        .with_profile(sample_profile("E1", 0, 0, true))
        .with_avatar("E1", &[0u8; 64]);

    let settings = GeneratorSettings {
        max_avatar_bytes: 32,
        ..GeneratorSettings::default()
    };
    let err = engine(&source, settings)
        .generate(&request(&["E1"], GenerationMode::Internal))
        .await
        .unwrap_err();
    assert!(matches!(err, OnePagerError::ProcessingError { .. }));
}

#[tokio::test]
async fn test_broken_template_is_template_error() {
    let source = InMemorySource::new(b"PK not really a zip".to_vec())
        .with_profile(sample_profile("E1", 0, 0, false));

    let err = engine(&source, GeneratorSettings::default())
        .generate(&request(&["E1"], GenerationMode::Internal))
        .await
        .unwrap_err();
    assert!(matches!(err, OnePagerError::TemplateError { .. }));
    assert!(!err.is_caller_error());
}

#[tokio::test]
async fn test_custom_anonymized_name_and_bundle_name() {
    let source = InMemorySource::new(build_template())
        .with_profile(sample_profile("E1", 0, 0, false))
        .with_profile(sample_profile("E2", 0, 0, false));

    let settings = GeneratorSettings {
        anonymized_name: "Senior Consultant".to_string(),
        bundle_filename: "Team.zip".to_string(),
        ..GeneratorSettings::default()
    };
    let result = engine(&source, settings)
        .generate(&request(&["E2", "E1"], GenerationMode::External))
        .await
        .unwrap();

    assert_eq!(result.filename, "Team.zip");
    let (_, first) = &zip_entries(&result.bytes)[0];
    assert!(zip_text(first, "ppt/slides/slide1.xml").contains("<a:t>Senior Consultant</a:t>"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_share_one_template() {
    let ids = ["E1", "E2", "E3", "E4", "E5", "E6"];
    let mut source = InMemorySource::new(build_template());
    for id in ids {
        source = source
            .with_profile(sample_profile(id, 1, 1, true))
            .with_avatar(id, format!("avatar {}", id).as_bytes());
    }
    let engine = Arc::new(engine(&source, GeneratorSettings::default()));

    let handles: Vec<_> = ids
        .iter()
        .map(|id| {
            let engine = Arc::clone(&engine);
            let req = request(&[*id], GenerationMode::Internal);
            tokio::spawn(async move { engine.generate(&req).await })
        })
        .collect();

    for (id, handle) in ids.iter().zip(handles) {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.filename, format!("OP_{}.pptx", id));

        let slide = zip_text(&result.bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains(&format!("<a:t>Employee {}</a:t>", id)));
        assert_eq!(
            zip_entry(&result.bytes, "ppt/media/image1.png"),
            format!("avatar {}", id).into_bytes()
        );
    }

    assert_eq!(source.template_loads.load(Ordering::SeqCst), 1);
}
