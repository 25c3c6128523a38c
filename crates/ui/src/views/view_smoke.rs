use crate::sink::Region;
use crate::views::{FlashcardKey, IndexPage, TopicPage, ViewError};

use super::test_harness::{id, insert_topic, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn index_renders_lists_and_counters() {
    let harness = setup_view_harness(&["T01", "T02", "T03"]);
    insert_topic(&harness.source, "T01", "Romantismus", 2);
    insert_topic(&harness.source, "T02", "Baroko", 1);
    harness.store.set_completed(&id("T02"), true);

    let mut page = IndexPage::new(harness.ctx.clone(), harness.sink());
    page.init().await.expect("index init");

    let list = harness.sink.markup(Region::IndexTopicsList).unwrap();
    let baroko = list.find("Baroko").unwrap();
    let romantismus = list.find("Romantismus").unwrap();
    assert!(baroko < romantismus, "ordered by `order`: {list}");
    assert!(list.contains(r#"href="topic.html?id=T02""#));
    assert_eq!(list.matches("completion-check completed").count(), 1);
    assert_eq!(
        harness.sink.markup(Region::TopicsList),
        harness.sink.markup(Region::MobileTopicsList)
    );
    assert_eq!(harness.sink.markup(Region::TotalTopics).as_deref(), Some("2"));
    assert_eq!(harness.sink.markup(Region::CompletedTopics).as_deref(), Some("1"));
}

#[tokio::test(flavor = "current_thread")]
async fn index_reports_when_nothing_loads() {
    let harness = setup_view_harness(&["T01"]);
    let mut page = IndexPage::new(harness.ctx.clone(), harness.sink());

    assert_eq!(page.init().await, Err(ViewError::NoTopics));
    for region in [Region::TopicsList, Region::MobileTopicsList, Region::IndexTopicsList] {
        let markup = harness.sink.markup(region).unwrap();
        assert!(markup.contains("Chyba při načítání otázek"), "{markup}");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn index_follows_progress_until_dropped() {
    let harness = setup_view_harness(&["T01"]);
    insert_topic(&harness.source, "T01", "Renesance", 1);

    let mut page = IndexPage::new(harness.ctx.clone(), harness.sink());
    page.init().await.expect("index init");
    assert_eq!(harness.sink.markup(Region::CompletedTopics).as_deref(), Some("0"));

    harness.store.set_completed(&id("T01"), true);
    assert_eq!(harness.sink.markup(Region::CompletedTopics).as_deref(), Some("1"));

    drop(page);
    let renders = harness.sink.render_count(Region::CompletedTopics);
    harness.store.set_completed(&id("T01"), false);
    assert_eq!(harness.sink.render_count(Region::CompletedTopics), renders);
}

#[tokio::test(flavor = "current_thread")]
async fn topic_page_renders_every_section() {
    let harness = setup_view_harness(&["T01", "T02", "T03"]);
    insert_topic(&harness.source, "T01", "Baroko", 1);
    insert_topic(&harness.source, "T02", "Romantismus", 2);
    insert_topic(&harness.source, "T03", "Moderna", 3);

    let mut page = TopicPage::new(harness.ctx.clone(), harness.sink());
    page.init_from_address("topic.html?id=T02")
        .await
        .expect("topic init");

    let sink = &harness.sink;
    assert_eq!(sink.markup(Region::TopicTitle).as_deref(), Some("Romantismus"));
    assert_eq!(
        sink.markup(Region::PageTitle).as_deref(),
        Some("Romantismus - Dějiny tance a baletu - Maturitní otázky")
    );
    assert_eq!(
        sink.markup(Region::ObjectivesList).unwrap().matches("objective-item").count(),
        2
    );
    let materials = sink.markup(Region::MaterialsContent).unwrap();
    assert!(materials.contains("<strong>Shrnutí</strong>"));
    assert!(materials.contains("Počátky"));
    assert!(materials.contains("</p><p>"));
    assert!(sink.is_hidden(Region::AudioSection));
    assert!(!sink.is_hidden(Region::ResourcesSection));
    assert!(sink
        .markup(Region::ResourcesList)
        .unwrap()
        .contains("https://example.org/?a=1&amp;b=2"));

    let sidebar = sink.markup(Region::TopicsList).unwrap();
    assert_eq!(sidebar.matches(r#"aria-current="page""#).count(), 1);
    assert!(sidebar.contains(r#"class="topic-link active""#));

    let prev = sink.markup(Region::PrevButton).unwrap();
    let next = sink.markup(Region::NextButton).unwrap();
    assert!(prev.contains("topic.html?id=T01") && prev.contains("← Baroko"));
    assert!(next.contains("topic.html?id=T03") && next.contains("Moderna →"));

    let cards = sink.markup(Region::FlashcardsContainer).unwrap();
    assert!(cards.contains("1 z 1"));
    assert!(cards.contains("Kdo?"));
}

#[tokio::test(flavor = "current_thread")]
async fn topic_page_disables_navigation_at_edges() {
    let harness = setup_view_harness(&["T01"]);
    insert_topic(&harness.source, "T01", "Baroko", 1);

    let mut page = TopicPage::new(harness.ctx.clone(), harness.sink());
    page.init(Some(id("T01"))).await.expect("topic init");

    let prev = harness.sink.markup(Region::PrevButton).unwrap();
    let next = harness.sink.markup(Region::NextButton).unwrap();
    assert!(prev.contains(r##"href="#""##) && prev.contains("disabled"));
    assert!(prev.contains("← Předchozí"));
    assert!(next.contains("Další →") && next.contains(r#"aria-disabled="true""#));
}

#[tokio::test(flavor = "current_thread")]
async fn topic_page_reports_missing_and_unknown_ids() {
    let harness = setup_view_harness(&["T01"]);
    insert_topic(&harness.source, "T01", "Baroko", 1);

    let mut page = TopicPage::new(harness.ctx.clone(), harness.sink());
    assert_eq!(
        page.init_from_address("topic.html").await,
        Err(ViewError::MissingTopicId)
    );
    assert_eq!(
        harness.sink.markup(Region::TopicTitle).as_deref(),
        Some("Chyba: Nebylo zadáno ID otázky")
    );

    let mut page = TopicPage::new(harness.ctx.clone(), harness.sink());
    assert_eq!(
        page.init(Some(id("T99"))).await,
        Err(ViewError::TopicNotFound(id("T99")))
    );
    assert_eq!(
        harness.sink.markup(Region::TopicTitle).as_deref(),
        Some("Chyba: Otázka T99 nenalezena")
    );
    assert!(page.topic().is_none());
    assert_eq!(page.toggle_completion(), None);
}

#[tokio::test(flavor = "current_thread")]
async fn topic_page_reports_broken_documents() {
    let harness = setup_view_harness(&["T01"]);
    harness
        .source
        .insert("data/topics/T01.json", "{ not json");

    let mut page = TopicPage::new(harness.ctx.clone(), harness.sink());
    let err = page.init(Some(id("T01"))).await.unwrap_err();
    assert!(matches!(err, ViewError::Load(_)), "{err:?}");
    assert!(harness
        .sink
        .markup(Region::TopicTitle)
        .unwrap()
        .starts_with("Chyba při načítání otázky:"));
}

#[tokio::test(flavor = "current_thread")]
async fn completion_toggle_updates_store_and_sidebar() {
    let harness = setup_view_harness(&["T01", "T02"]);
    insert_topic(&harness.source, "T01", "Baroko", 1);
    insert_topic(&harness.source, "T02", "Romantismus", 2);

    let mut page = TopicPage::new(harness.ctx.clone(), harness.sink());
    page.init(Some(id("T01"))).await.expect("topic init");
    let toggle = harness.sink.markup(Region::CompletionToggle).unwrap();
    assert!(toggle.contains("Označit jako dokončené") && !toggle.contains("checked"));

    assert_eq!(page.toggle_completion(), Some(true));
    assert!(harness.store.is_completed(&id("T01")));
    let toggle = harness.sink.markup(Region::CompletionToggle).unwrap();
    assert!(toggle.contains("Dokončeno") && toggle.contains(" checked"));
    assert_eq!(
        harness
            .sink
            .markup(Region::MobileTopicsList)
            .unwrap()
            .matches("completion-check completed")
            .count(),
        1
    );

    assert_eq!(page.toggle_completion(), Some(false));
    assert!(!harness.store.is_completed(&id("T01")));
}

#[tokio::test(flavor = "current_thread")]
async fn topic_without_cards_hides_flashcards() {
    let harness = setup_view_harness(&["T01"]);
    harness.source.insert(
        "data/topics/T01.json",
        r#"{"id": "T01", "title": "Bez kartiček", "audio": {"src": "a.mp3", "transcript": "Text"}}"#,
    );

    let mut page = TopicPage::new(harness.ctx.clone(), harness.sink());
    page.init(Some(id("T01"))).await.expect("topic init");

    assert!(harness.sink.is_hidden(Region::FlashcardsSection));
    assert!(harness.sink.is_hidden(Region::ObjectivesSection));
    assert!(!harness.sink.is_hidden(Region::AudioSection));
    let audio = harness.sink.markup(Region::AudioContent).unwrap();
    assert!(audio.contains(r#"src="a.mp3""#));
    assert!(audio.contains("Zobrazit přepis"));
    assert!(!page.flashcards_mut().handle_key(FlashcardKey::Other));
}

#[tokio::test(flavor = "current_thread")]
async fn completion_follows_page_id_not_document_id() {
    let harness = setup_view_harness(&["T07"]);
    harness.source.insert(
        "data/topics/T07.json",
        r#"{"id": "X07", "title": "Přejmenované téma"}"#,
    );

    let mut page = TopicPage::new(harness.ctx.clone(), harness.sink());
    page.init(Some(id("T07"))).await.expect("topic init");
    assert_eq!(page.topic_id(), Some(&id("T07")));

    assert_eq!(page.toggle_completion(), Some(true));
    assert!(harness.store.is_completed(&id("T07")));
    assert!(!harness.store.is_completed(&id("X07")));
    let toggle = harness.sink.markup(Region::CompletionToggle).unwrap();
    assert!(toggle.contains("Dokončeno") && toggle.contains(" checked"));
}
