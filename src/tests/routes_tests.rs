// Route Tests - parsing and formatting navigation paths

use crate::api::types::UserId;
use crate::routes::Route;
use crate::Error;

#[test]
fn test_parse_home() {
    assert_eq!("/".parse::<Route>().unwrap(), Route::Home);
    assert_eq!("".parse::<Route>().unwrap(), Route::Home);
    assert_eq!(Route::Home.guild_id(), None);
}

#[test]
fn test_parse_channel_route() {
    let route: Route = "/guild/cats.db/channel/general".parse().unwrap();

    assert_eq!(
        route,
        Route::Channel {
            guild_id: "cats.db".to_string(),
            channel_id: "general".to_string(),
        }
    );
    assert_eq!(route.guild_id(), Some("cats.db"));
}

#[test]
fn test_parse_user_route() {
    let route: Route = "guild/cats.db/users/1234/".parse().unwrap();

    assert_eq!(
        route,
        Route::UserProfile {
            guild_id: "cats.db".to_string(),
            user_id: UserId::from("1234"),
        }
    );
}

#[test]
fn test_parse_rejects_unknown_paths() {
    for path in ["/guild/cats.db", "/guild/cats.db/channel", "/users/1", "/guild/a/b/c"] {
        assert!(
            matches!(path.parse::<Route>(), Err(Error::InvalidRoute(_))),
            "{} should be rejected",
            path
        );
    }
}

#[test]
fn test_display_matches_parse() {
    let routes = vec![
        Route::Home,
        Route::Channel {
            guild_id: "cats.db".to_string(),
            channel_id: "memes".to_string(),
        },
        Route::UserProfile {
            guild_id: "cats.db".to_string(),
            user_id: UserId::from(77),
        },
    ];

    assert_eq!(routes[1].to_string(), "/guild/cats.db/channel/memes");
    assert_eq!(routes[2].to_string(), "/guild/cats.db/users/77");

    for route in routes {
        assert_eq!(route.to_string().parse::<Route>().unwrap(), route);
    }
}
