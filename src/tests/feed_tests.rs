// Feed Tests - paging, ordering, exhaustion, stale responses, search and scroll anchoring

use super::support::{expect_ids, ids, msg, page};
use crate::api::types::{Message, MessagePage};
use crate::feed::layout::FeedLine;
use crate::feed::*;
use crate::Error;

fn api_failure() -> Error {
    Error::Api {
        status: 500,
        message: "Could not retrieve messages".to_string(),
    }
}

/// Controller with page 1 = [6, 5] applied
fn loaded_feed() -> (FeedController, PageRequest) {
    let mut feed = FeedController::new();
    let request = feed.select_channel("guild.db", "general");
    feed.apply_page(&request, page(1, &[6, 5]));
    (feed, request)
}

#[test]
fn test_select_channel_resets_state() {
    let mut feed = FeedController::new();
    assert_eq!(feed.phase(), FeedPhase::Idle);

    let request = feed.select_channel("guild.db", "general");

    assert_eq!(request.page, 1);
    assert_eq!(request.kind, PageKind::Initial);
    assert_eq!(request.generation, feed.generation());
    assert_eq!(feed.phase(), FeedPhase::Loading);
    assert_eq!(feed.state().page, 1);
    assert!(feed.has_more());
    assert!(feed.messages().is_empty());
}

#[test]
fn test_three_page_scenario() {
    let mut feed = FeedController::new();
    let first = feed.select_channel("guild.db", "general");

    let effect = feed.apply_page(&first, page(1, &[6, 5]));
    assert_eq!(effect, FeedEffect::Loaded { count: 2 });
    assert_eq!(ids(feed.messages()), expect_ids(&[5, 6]));

    let second = feed.on_scroll_top().expect("Page 2 should be requested");
    assert_eq!(second.page, 2);
    assert_eq!(second.kind, PageKind::Older);
    let effect = feed.apply_page(&second, page(2, &[4, 3]));
    assert_eq!(effect, FeedEffect::Prepended { count: 2 });
    assert_eq!(ids(feed.messages()), expect_ids(&[3, 4, 5, 6]));

    let third = feed.on_scroll_top().expect("Page 3 should be requested");
    assert_eq!(third.page, 3);
    feed.apply_page(&third, page(3, &[2, 1]));
    assert_eq!(ids(feed.messages()), expect_ids(&[1, 2, 3, 4, 5, 6]));

    let fourth = feed.on_scroll_top().expect("Page 4 should be requested");
    assert_eq!(fourth.page, 4);
    let effect = feed.apply_page(&fourth, page(4, &[]));
    assert_eq!(effect, FeedEffect::Exhausted);
    assert!(!feed.has_more());
    assert_eq!(feed.phase(), FeedPhase::Exhausted);
    assert_eq!(ids(feed.messages()), expect_ids(&[1, 2, 3, 4, 5, 6]));
}

#[test]
fn test_no_requests_after_exhaustion() {
    let (mut feed, _) = loaded_feed();

    let request = feed.on_scroll_top().unwrap();
    feed.apply_page(&request, page(2, &[]));

    for _ in 0..5 {
        assert!(feed.on_scroll_top().is_none());
        assert!(feed.scroll_up(100).is_none());
    }
    assert!(!feed.has_more());
}

#[test]
fn test_empty_first_page_exhausts_channel() {
    let mut feed = FeedController::new();
    let request = feed.select_channel("guild.db", "empty");

    assert_eq!(feed.apply_page(&request, page(1, &[])), FeedEffect::Exhausted);
    assert!(feed.messages().is_empty());
    assert!(feed.on_scroll_top().is_none());
}

#[test]
fn test_repeated_scroll_top_issues_one_request() {
    let (mut feed, _) = loaded_feed();

    let first = feed.on_scroll_top();
    assert!(first.is_some());
    assert!(feed.is_loading_older());
    assert_eq!(feed.phase(), FeedPhase::LoadingOlder);

    assert!(feed.on_scroll_top().is_none());
    assert!(feed.scroll_up(1).is_none());
    assert!(feed.on_scroll_top().is_none());
}

#[test]
fn test_no_request_while_initial_page_loading() {
    let mut feed = FeedController::new();
    feed.select_channel("guild.db", "general");

    assert!(feed.on_scroll_top().is_none());
}

#[test]
fn test_no_request_without_channel() {
    let mut feed = FeedController::new();
    assert!(feed.on_scroll_top().is_none());
}

#[test]
fn test_failure_keeps_state_and_allows_retry() {
    let (mut feed, _) = loaded_feed();

    let request = feed.on_scroll_top().unwrap();
    let effect = feed.apply_failure(&request, &api_failure());

    assert_eq!(effect, FeedEffect::Failed);
    assert_eq!(feed.phase(), FeedPhase::Ready);
    assert!(feed.has_more(), "Errors must not end the history");
    assert!(!feed.is_loading_older());
    assert_eq!(ids(feed.messages()), expect_ids(&[5, 6]));

    let retry = feed.on_scroll_top().expect("Retry should be possible");
    assert_eq!(retry.page, 2, "The same page should be requested again");
}

#[test]
fn test_initial_failure_retries_first_page() {
    let mut feed = FeedController::new();
    let request = feed.select_channel("guild.db", "general");
    feed.apply_failure(&request, &api_failure());

    let retry = feed.on_scroll_top().expect("Page 1 should be retried");
    assert_eq!(retry.page, 1);
    assert_eq!(retry.kind, PageKind::Initial);

    feed.apply_page(&retry, page(1, &[2, 1]));
    assert_eq!(ids(feed.messages()), expect_ids(&[1, 2]));
}

#[test]
fn test_stale_response_from_previous_channel_is_discarded() {
    let mut feed = FeedController::new();
    let old = feed.select_channel("guild.db", "general");
    let new = feed.select_channel("guild.db", "random");

    assert_eq!(feed.apply_page(&old, page(1, &[9, 8])), FeedEffect::Stale);
    assert!(feed.messages().is_empty());
    assert_eq!(feed.phase(), FeedPhase::Loading);

    assert_eq!(feed.apply_failure(&old, &api_failure()), FeedEffect::Stale);
    assert_eq!(feed.phase(), FeedPhase::Loading);

    feed.apply_page(&new, page(1, &[2, 1]));
    assert_eq!(ids(feed.messages()), expect_ids(&[1, 2]));
}

#[test]
fn test_stale_older_page_after_switch_is_discarded() {
    let (mut feed, _) = loaded_feed();
    let older = feed.on_scroll_top().unwrap();

    let fresh = feed.select_channel("guild.db", "random");
    assert_eq!(feed.state().page, 1);
    assert!(feed.has_more());
    assert!(!feed.is_loading_older());

    assert_eq!(feed.apply_page(&older, page(2, &[4, 3])), FeedEffect::Stale);
    assert!(feed.messages().is_empty());

    feed.apply_page(&fresh, page(1, &[11, 10]));
    assert_eq!(ids(feed.messages()), expect_ids(&[10, 11]));
}

#[test]
fn test_out_of_order_page_is_discarded() {
    let (mut feed, first) = loaded_feed();

    // Replaying page 1 must not be applied a second time
    assert_eq!(feed.apply_page(&first, page(1, &[6, 5])), FeedEffect::Stale);

    let request = feed.on_scroll_top().unwrap();
    let skipped = PageRequest {
        page: 3,
        ..request.clone()
    };
    assert_eq!(feed.apply_page(&skipped, page(3, &[2, 1])), FeedEffect::Stale);
    assert_eq!(ids(feed.messages()), expect_ids(&[5, 6]));
}

#[test]
fn test_duplicate_ids_are_not_loaded_twice() {
    let (mut feed, _) = loaded_feed();

    let request = feed.on_scroll_top().unwrap();
    let effect = feed.apply_page(&request, page(2, &[5, 4, 3]));

    assert_eq!(effect, FeedEffect::Prepended { count: 2 });
    assert_eq!(ids(feed.messages()), expect_ids(&[3, 4, 5, 6]));
}

#[test]
fn test_window_stays_ordered_and_unique() {
    let mut feed = FeedController::new();
    let request = feed.select_channel("guild.db", "general");
    feed.apply_page(&request, page(1, &[30, 29, 28]));

    let mut next_id = 27;
    for number in 2..=6 {
        let request = feed.on_scroll_top().unwrap();
        assert_eq!(request.page, number);
        let batch: Vec<u32> = (0..3).map(|i| next_id - i).collect();
        next_id -= 3;
        feed.apply_page(&request, page(number, &batch));

        let loaded: Vec<u32> = feed
            .messages()
            .iter()
            .map(|m| m.id.as_str().parse().unwrap())
            .collect();
        let mut sorted = loaded.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(loaded, sorted, "Window must be oldest-first without duplicates");
        assert_eq!(*loaded.last().unwrap(), 30);
    }
}

fn alice_and_bob() -> Vec<Message> {
    vec![
        Message::new("1", "Alice", "hello world", "2024-01-01T10:00:00Z"),
        Message::new("2", "Bob", "bye", "2024-01-01T10:01:00Z"),
    ]
}

#[test]
fn test_search_scenario() {
    let messages = alice_and_bob();

    let by_author = filter_messages(&messages, "Al");
    assert_eq!(by_author.len(), 1);
    assert_eq!(by_author[0].user_name, "Alice");

    let by_body = filter_messages(&messages, "hello");
    assert_eq!(by_body.len(), 1);
    assert_eq!(by_body[0].content, "hello world");

    assert_eq!(filter_messages(&messages, "").len(), 2);
}

#[test]
fn test_search_is_case_insensitive() {
    let messages = alice_and_bob();

    assert_eq!(filter_messages(&messages, "aLiCe").len(), 1);
    assert_eq!(filter_messages(&messages, "HELLO").len(), 1);
    assert_eq!(filter_messages(&messages, "BYE")[0].user_name, "Bob");
    assert!(filter_messages(&messages, "nothing").is_empty());
}

#[test]
fn test_search_is_pure_and_reversible() {
    let mut feed = FeedController::new();
    let request = feed.select_channel("guild.db", "general");
    feed.apply_page(
        &request,
        MessagePage {
            page: 1,
            messages: alice_and_bob().into_iter().rev().collect(),
        },
    );
    let original: Vec<Message> = feed.messages().to_vec();

    feed.set_search("hello");
    let once: Vec<Message> = feed.filtered().into_iter().cloned().collect();
    feed.set_search("hello");
    let twice: Vec<Message> = feed.filtered().into_iter().cloned().collect();
    assert_eq!(once, twice);
    assert_eq!(once.len(), 1);

    feed.set_search("");
    let restored: Vec<Message> = feed.filtered().into_iter().cloned().collect();
    assert_eq!(restored, original);
    assert_eq!(feed.messages(), original.as_slice());
}

#[test]
fn test_search_applies_to_newly_loaded_pages() {
    let (mut feed, _) = loaded_feed();
    feed.set_search("user3");
    assert!(feed.filtered().is_empty());

    let request = feed.on_scroll_top().unwrap();
    feed.apply_page(&request, page(2, &[4, 3]));

    let matches = feed.filtered();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id.as_str(), "3");
}

#[test]
fn test_search_term_survives_channel_switch() {
    let (mut feed, _) = loaded_feed();
    feed.set_search("hello");

    feed.select_channel("guild.db", "random");
    assert_eq!(feed.search_term(), "hello");
    assert_eq!(feed.state().search_term, "hello");
}

#[test]
fn test_initial_page_is_bottom_aligned() {
    let mut feed = FeedController::new();
    feed.set_view_size(4, 80);
    let request = feed.select_channel("guild.db", "general");
    feed.apply_page(&request, page(1, &[6, 5]));

    // Two messages of three lines each in a four-line pane
    assert_eq!(feed.viewport().content_height(), 6);
    assert_eq!(feed.viewport().offset(), 2);
    assert!(feed.viewport().at_bottom());
    assert_eq!(feed.visible_lines().len(), 4);
}

#[test]
fn test_prepend_keeps_visible_content_in_place() {
    let mut feed = FeedController::new();
    feed.set_view_size(4, 80);
    let request = feed.select_channel("guild.db", "general");
    feed.apply_page(&request, page(1, &[6, 5]));

    let older = feed.scroll_up(2).expect("Reaching the top should load page 2");
    assert_eq!(feed.viewport().offset(), 0);
    let before = feed.visible_lines().to_vec();
    let previous_height = feed.viewport().content_height();

    feed.apply_page(&older, page(2, &[4, 3]));

    let new_height = feed.viewport().content_height();
    assert_eq!(new_height, 12);
    assert_eq!(feed.viewport().offset(), new_height - previous_height);
    assert_eq!(feed.visible_lines(), before.as_slice());
    assert_eq!(
        feed.visible_lines()[0],
        FeedLine::Header {
            author: "user5".to_string(),
            timestamp: msg(5).display_timestamp(),
        }
    );
}

fn wide_page(number: u32, ids: &[u32]) -> MessagePage {
    MessagePage {
        page: number,
        messages: ids
            .iter()
            .map(|&id| {
                Message::new(
                    id.to_string(),
                    format!("user{}", id),
                    format!("猫{} 你好世界你好世界你好 😺😺😺 supercalifragilistic", id),
                    "2024-01-01T12:00:00Z",
                )
            })
            .collect(),
    }
}

#[test]
fn test_prepend_of_wide_messages_keeps_visible_content_in_place() {
    let mut feed = FeedController::new();
    feed.set_view_size(5, 10);
    let request = feed.select_channel("guild.db", "general");
    feed.apply_page(&request, wide_page(1, &[6, 5]));
    assert!(feed.viewport().at_bottom());

    let older = feed
        .scroll_up(usize::MAX)
        .expect("Reaching the top should load page 2");
    let before = feed.visible_lines().to_vec();
    let previous_height = feed.viewport().content_height();

    feed.apply_page(&older, wide_page(2, &[4, 3]));

    let new_height = feed.viewport().content_height();
    assert_eq!(new_height, previous_height * 2);
    assert_eq!(feed.viewport().offset(), new_height - previous_height);
    assert_eq!(feed.visible_lines(), before.as_slice());
}

#[test]
fn test_scroll_up_away_from_top_does_not_load() {
    let mut feed = FeedController::new();
    feed.set_view_size(2, 80);
    let request = feed.select_channel("guild.db", "general");
    feed.apply_page(&request, page(1, &[6, 5]));

    assert_eq!(feed.viewport().offset(), 4);
    assert!(feed.scroll_up(1).is_none());
    assert_eq!(feed.viewport().offset(), 3);
}

#[test]
fn test_clear_invalidates_in_flight_page() {
    let (mut feed, _) = loaded_feed();
    let older = feed.on_scroll_top().unwrap();

    feed.clear();
    assert_eq!(feed.phase(), FeedPhase::Idle);
    assert!(feed.channel().is_none());
    assert_eq!(feed.apply_page(&older, page(2, &[4, 3])), FeedEffect::Stale);
    assert!(feed.messages().is_empty());
}
