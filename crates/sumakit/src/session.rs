//! Session cookie extraction from login responses.

use crate::types::{SESSION_COOKIE, SessionCookie};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Find the session cookie among a response's `Set-Cookie` header values.
///
/// Cookies with an empty value, `Max-Age=0` or an `Expires` date in the past
/// are expiry notices, not sessions, and are skipped. `Max-Age` wins over
/// `Expires` when both are present. Returns `None` when no live session
/// cookie was set.
pub fn find_session_cookie<'a, I>(set_cookie_headers: I) -> Option<SessionCookie>
where
    I: IntoIterator<Item = &'a str>,
{
    find_session_cookie_at(set_cookie_headers, Utc::now())
}

fn find_session_cookie_at<'a, I>(set_cookie_headers: I, now: DateTime<Utc>) -> Option<SessionCookie>
where
    I: IntoIterator<Item = &'a str>,
{
    set_cookie_headers
        .into_iter()
        .filter_map(parse_set_cookie)
        .find(|cookie| cookie.name == SESSION_COOKIE && cookie.is_live(now))
        .map(|cookie| SessionCookie::new(cookie.value))
}

struct SetCookie<'a> {
    name: &'a str,
    value: &'a str,
    max_age: Option<i64>,
    expires: Option<DateTime<Utc>>,
}

impl SetCookie<'_> {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        if self.value.is_empty() {
            return false;
        }
        match (self.max_age, self.expires) {
            (Some(age), _) => age > 0,
            (None, Some(expires)) => expires > now,
            (None, None) => true,
        }
    }
}

fn parse_set_cookie(header: &str) -> Option<SetCookie<'_>> {
    let mut parts = header.split(';');
    let (name, value) = parts.next()?.split_once('=')?;

    let mut max_age = None;
    let mut expires = None;
    for (key, attr) in parts.filter_map(|attr| attr.split_once('=')) {
        let key = key.trim();
        if key.eq_ignore_ascii_case("max-age") {
            max_age = attr.trim().parse().ok();
        } else if key.eq_ignore_ascii_case("expires") {
            expires = parse_cookie_date(attr.trim());
        }
    }

    Some(SetCookie {
        name: name.trim(),
        value: value.trim().trim_matches('"'),
        max_age,
        expires,
    })
}

/// Parse an `Expires` value in RFC 1123 form or the dashed Netscape form
/// servlet containers still send. Unparseable dates are ignored.
fn parse_cookie_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%a, %d-%b-%Y %H:%M:%S GMT")
        .ok()
        .map(|naive| naive.and_utc())
}
