//! Built-in grok pattern table.
//!
//! The standard grok base set: numbers, words, network addresses, paths,
//! URIs, dates and times, syslog and Apache access logs, log levels. Every
//! engine is seeded from this table unless `skip-default-patterns` is set.
//!
//! Entries are written for the backtracking engine: look-behind is fixed
//! width and atomic groups `(?>...)` are used where the stock patterns rely
//! on them to bound backtracking.

/// A (name, expression) pair of the default table.
pub struct PatternEntry {
    pub name: &'static str,
    pub pattern: &'static str,
}

pub const DEFAULT_PATTERNS: &[PatternEntry] = &[
    // ── Users ─────────────────────────────────────────────────────────────
    PatternEntry {
        name: "USERNAME",
        pattern: r"[a-zA-Z0-9._-]+",
    },
    PatternEntry {
        name: "USER",
        pattern: r"%{USERNAME}",
    },
    PatternEntry {
        name: "EMAILLOCALPART",
        pattern: r"[a-zA-Z][a-zA-Z0-9_.+-=:]+",
    },
    PatternEntry {
        name: "EMAILADDRESS",
        pattern: r"%{EMAILLOCALPART}@%{HOSTNAME}",
    },
    PatternEntry {
        name: "HTTPDUSER",
        pattern: r"%{EMAILADDRESS}|%{USER}",
    },
    // ── Numbers ───────────────────────────────────────────────────────────
    PatternEntry {
        name: "INT",
        pattern: r"(?:[+-]?(?:[0-9]+))",
    },
    PatternEntry {
        name: "BASE10NUM",
        pattern: r"(?<![0-9.+-])(?>[+-]?(?:(?:[0-9]+(?:\.[0-9]+)?)|(?:\.[0-9]+)))",
    },
    PatternEntry {
        name: "NUMBER",
        pattern: r"(?:%{BASE10NUM})",
    },
    PatternEntry {
        name: "BASE16NUM",
        pattern: r"(?<![0-9A-Fa-f])(?:[+-]?(?:0x)?(?:[0-9A-Fa-f]+))",
    },
    PatternEntry {
        name: "BASE16FLOAT",
        pattern: r"\b(?<![0-9A-Fa-f.])(?:[+-]?(?:0x)?(?:(?:[0-9A-Fa-f]+(?:\.[0-9A-Fa-f]*)?)|(?:\.[0-9A-Fa-f]+)))\b",
    },
    PatternEntry {
        name: "POSINT",
        pattern: r"\b(?:[1-9][0-9]*)\b",
    },
    PatternEntry {
        name: "NONNEGINT",
        pattern: r"\b(?:[0-9]+)\b",
    },
    // ── Words and strings ─────────────────────────────────────────────────
    PatternEntry {
        name: "WORD",
        pattern: r"\b\w+\b",
    },
    PatternEntry {
        name: "NOTSPACE",
        pattern: r"\S+",
    },
    PatternEntry {
        name: "SPACE",
        pattern: r"\s*",
    },
    PatternEntry {
        name: "DATA",
        pattern: r".*?",
    },
    PatternEntry {
        name: "GREEDYDATA",
        pattern: r".*",
    },
    PatternEntry {
        name: "QUOTEDSTRING",
        pattern: r#"(?>(?<!\\)(?>"(?>\\.|[^\\"]+)+"|""|(?>'(?>\\.|[^\\']+)+')|''|(?>`(?>\\.|[^\\`]+)+`)|``))"#,
    },
    PatternEntry {
        name: "QS",
        pattern: r"%{QUOTEDSTRING}",
    },
    PatternEntry {
        name: "UUID",
        pattern: r"[A-Fa-f0-9]{8}-(?:[A-Fa-f0-9]{4}-){3}[A-Fa-f0-9]{12}",
    },
    // ── Networking ────────────────────────────────────────────────────────
    PatternEntry {
        name: "CISCOMAC",
        pattern: r"(?:(?:[A-Fa-f0-9]{4}\.){2}[A-Fa-f0-9]{4})",
    },
    PatternEntry {
        name: "WINDOWSMAC",
        pattern: r"(?:(?:[A-Fa-f0-9]{2}-){5}[A-Fa-f0-9]{2})",
    },
    PatternEntry {
        name: "COMMONMAC",
        pattern: r"(?:(?:[A-Fa-f0-9]{2}:){5}[A-Fa-f0-9]{2})",
    },
    PatternEntry {
        name: "MAC",
        pattern: r"(?:%{CISCOMAC}|%{WINDOWSMAC}|%{COMMONMAC})",
    },
    PatternEntry {
        name: "IPV6",
        pattern: r"((([0-9A-Fa-f]{1,4}:){7}([0-9A-Fa-f]{1,4}|:))|(([0-9A-Fa-f]{1,4}:){6}(:[0-9A-Fa-f]{1,4}|((25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)(\.(25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)){3})|:))|(([0-9A-Fa-f]{1,4}:){5}(((:[0-9A-Fa-f]{1,4}){1,2})|:((25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)(\.(25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)){3})|:))|(([0-9A-Fa-f]{1,4}:){4}(((:[0-9A-Fa-f]{1,4}){1,3})|((:[0-9A-Fa-f]{1,4})?:((25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)(\.(25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)){3}))|:))|(([0-9A-Fa-f]{1,4}:){3}(((:[0-9A-Fa-f]{1,4}){1,4})|((:[0-9A-Fa-f]{1,4}){0,2}:((25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)(\.(25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)){3}))|:))|(([0-9A-Fa-f]{1,4}:){2}(((:[0-9A-Fa-f]{1,4}){1,5})|((:[0-9A-Fa-f]{1,4}){0,3}:((25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)(\.(25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)){3}))|:))|(([0-9A-Fa-f]{1,4}:){1}(((:[0-9A-Fa-f]{1,4}){1,6})|((:[0-9A-Fa-f]{1,4}){0,4}:((25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)(\.(25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)){3}))|:))|(:(((:[0-9A-Fa-f]{1,4}){1,7})|((:[0-9A-Fa-f]{1,4}){0,5}:((25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)(\.(25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)){3}))|:)))(%.+)?",
    },
    PatternEntry {
        name: "IPV4",
        pattern: r"(?<![0-9])(?:(?:[0-1]?[0-9]{1,2}|2[0-4][0-9]|25[0-5])[.](?:[0-1]?[0-9]{1,2}|2[0-4][0-9]|25[0-5])[.](?:[0-1]?[0-9]{1,2}|2[0-4][0-9]|25[0-5])[.](?:[0-1]?[0-9]{1,2}|2[0-4][0-9]|25[0-5]))(?![0-9])",
    },
    PatternEntry {
        name: "IP",
        pattern: r"(?:%{IPV6}|%{IPV4})",
    },
    PatternEntry {
        name: "HOSTNAME",
        pattern: r"\b(?:[0-9A-Za-z][0-9A-Za-z-]{0,62})(?:\.(?:[0-9A-Za-z][0-9A-Za-z-]{0,62}))*(\.?|\b)",
    },
    PatternEntry {
        name: "IPORHOST",
        pattern: r"(?:%{IP}|%{HOSTNAME})",
    },
    PatternEntry {
        name: "HOSTPORT",
        pattern: r"%{IPORHOST}:%{POSINT}",
    },
    // ── Paths and URIs ────────────────────────────────────────────────────
    PatternEntry {
        name: "UNIXPATH",
        pattern: r"(?:/(?:[\w_%!$@:.,+~-]+|\\.)*)+",
    },
    PatternEntry {
        name: "TTY",
        pattern: r"(?:/dev/(pts|tty([pq])?)(\w+)?/?(?:[0-9]+))",
    },
    PatternEntry {
        name: "WINPATH",
        pattern: r"(?>[A-Za-z]+:|\\)(?:\\[^\\?*]*)+",
    },
    PatternEntry {
        name: "PATH",
        pattern: r"(?:%{UNIXPATH}|%{WINPATH})",
    },
    PatternEntry {
        name: "URIPROTO",
        pattern: r"[A-Za-z]([A-Za-z0-9+\-.]+)+",
    },
    PatternEntry {
        name: "URIHOST",
        pattern: r"%{IPORHOST}(?::%{POSINT:port})?",
    },
    PatternEntry {
        name: "URIPATH",
        pattern: r"(?:/[A-Za-z0-9$.+!*'(){},~:;=@#%&_\-]*)+",
    },
    PatternEntry {
        name: "URIPARAM",
        pattern: r"\?[A-Za-z0-9$.+!*'|(){},~@#%&/=:;_?\-\[\]<>]*",
    },
    PatternEntry {
        name: "URIPATHPARAM",
        pattern: r"%{URIPATH}(?:%{URIPARAM})?",
    },
    PatternEntry {
        name: "URI",
        pattern: r"%{URIPROTO}://(?:%{USER}(?::[^@]*)?@)?(?:%{URIHOST})?(?:%{URIPATHPARAM})?",
    },
    // ── Dates and times ───────────────────────────────────────────────────
    PatternEntry {
        name: "MONTH",
        pattern: r"\b(?:[Jj]an(?:uary|uar)?|[Ff]eb(?:ruary|ruar)?|[Mm](?:a|ä)?r(?:ch|z)?|[Aa]pr(?:il)?|[Mm]a(?:y|i)?|[Jj]un(?:e|i)?|[Jj]ul(?:y)?|[Aa]ug(?:ust)?|[Ss]ep(?:tember)?|[Oo](?:c|k)?t(?:ober)?|[Nn]ov(?:ember)?|[Dd]e(?:c|z)(?:ember)?)\b",
    },
    PatternEntry {
        name: "MONTHNUM",
        pattern: r"(?:0?[1-9]|1[0-2])",
    },
    PatternEntry {
        name: "MONTHNUM2",
        pattern: r"(?:0[1-9]|1[0-2])",
    },
    PatternEntry {
        name: "MONTHDAY",
        pattern: r"(?:(?:0[1-9])|(?:[12][0-9])|(?:3[01])|[1-9])",
    },
    PatternEntry {
        name: "DAY",
        pattern: r"(?:Mon(?:day)?|Tue(?:sday)?|Wed(?:nesday)?|Thu(?:rsday)?|Fri(?:day)?|Sat(?:urday)?|Sun(?:day)?)",
    },
    PatternEntry {
        name: "YEAR",
        pattern: r"(?>\d\d){1,2}",
    },
    PatternEntry {
        name: "HOUR",
        pattern: r"(?:2[0123]|[01]?[0-9])",
    },
    PatternEntry {
        name: "MINUTE",
        pattern: r"(?:[0-5][0-9])",
    },
    // 60 is a leap second
    PatternEntry {
        name: "SECOND",
        pattern: r"(?:(?:[0-5]?[0-9]|60)(?:[:.,][0-9]+)?)",
    },
    PatternEntry {
        name: "TIME",
        pattern: r"(?<![0-9])%{HOUR}:%{MINUTE}(?::%{SECOND})(?![0-9])",
    },
    PatternEntry {
        name: "DATE_US",
        pattern: r"%{MONTHNUM}[/-]%{MONTHDAY}[/-]%{YEAR}",
    },
    PatternEntry {
        name: "DATE_EU",
        pattern: r"%{MONTHDAY}[./-]%{MONTHNUM}[./-]%{YEAR}",
    },
    PatternEntry {
        name: "ISO8601_TIMEZONE",
        pattern: r"(?:Z|[+-]%{HOUR}(?::?%{MINUTE}))",
    },
    PatternEntry {
        name: "ISO8601_SECOND",
        pattern: r"(?:%{SECOND}|60)",
    },
    PatternEntry {
        name: "TIMESTAMP_ISO8601",
        pattern: r"%{YEAR}-%{MONTHNUM}-%{MONTHDAY}[T ]%{HOUR}:?%{MINUTE}(?::?%{SECOND})?%{ISO8601_TIMEZONE}?",
    },
    PatternEntry {
        name: "DATE",
        pattern: r"%{DATE_US}|%{DATE_EU}",
    },
    PatternEntry {
        name: "DATESTAMP",
        pattern: r"%{DATE}[- ]%{TIME}",
    },
    PatternEntry {
        name: "TZ",
        pattern: r"(?:[APMCE][SD]T|UTC)",
    },
    PatternEntry {
        name: "DATESTAMP_RFC822",
        pattern: r"%{DAY} %{MONTH} %{MONTHDAY} %{YEAR} %{TIME} %{TZ}",
    },
    PatternEntry {
        name: "DATESTAMP_RFC2822",
        pattern: r"%{DAY}, %{MONTHDAY} %{MONTH} %{YEAR} %{TIME} %{ISO8601_TIMEZONE}",
    },
    PatternEntry {
        name: "DATESTAMP_OTHER",
        pattern: r"%{DAY} %{MONTH} %{MONTHDAY} %{TIME} %{TZ} %{YEAR}",
    },
    PatternEntry {
        name: "DATESTAMP_EVENTLOG",
        pattern: r"%{YEAR}%{MONTHNUM2}%{MONTHDAY}%{HOUR}%{MINUTE}%{SECOND}",
    },
    PatternEntry {
        name: "HTTPDATE",
        pattern: r"%{MONTHDAY}/%{MONTH}/%{YEAR}:%{TIME} %{INT}",
    },
    // ── Syslog ────────────────────────────────────────────────────────────
    PatternEntry {
        name: "SYSLOGTIMESTAMP",
        pattern: r"%{MONTH} +%{MONTHDAY} %{TIME}",
    },
    PatternEntry {
        name: "PROG",
        pattern: r"[\x21-\x5a\x5c\x5e-\x7e]+",
    },
    PatternEntry {
        name: "SYSLOGPROG",
        pattern: r"%{PROG:program}(?:\[%{POSINT:pid}\])?",
    },
    PatternEntry {
        name: "SYSLOGHOST",
        pattern: r"%{IPORHOST}",
    },
    PatternEntry {
        name: "SYSLOGFACILITY",
        pattern: r"<%{NONNEGINT:facility}.%{NONNEGINT:priority}>",
    },
    PatternEntry {
        name: "SYSLOGBASE",
        pattern: r"%{SYSLOGTIMESTAMP:timestamp} (?:%{SYSLOGFACILITY} )?%{SYSLOGHOST:logsource} %{SYSLOGPROG}:",
    },
    // ── Access logs ───────────────────────────────────────────────────────
    PatternEntry {
        name: "COMMONAPACHELOG",
        pattern: r#"%{IPORHOST:clientip} %{HTTPDUSER:ident} %{USER:auth} \[%{HTTPDATE:timestamp}\] "(?:%{WORD:verb} %{NOTSPACE:request}(?: HTTP/%{NUMBER:httpversion})?|%{DATA:rawrequest})" %{NUMBER:response} (?:%{NUMBER:bytes}|-)"#,
    },
    PatternEntry {
        name: "COMBINEDAPACHELOG",
        pattern: r"%{COMMONAPACHELOG} %{QS:referrer} %{QS:agent}",
    },
    // ── Log levels ────────────────────────────────────────────────────────
    PatternEntry {
        name: "LOGLEVEL",
        pattern: r"([Aa]lert|ALERT|[Tt]race|TRACE|[Dd]ebug|DEBUG|[Nn]otice|NOTICE|[Ii]nfo|INFO|[Ww]arn?(?:ing)?|WARN?(?:ING)?|[Ee]rr?(?:or)?|ERR?(?:OR)?|[Cc]rit?(?:ical)?|CRIT?(?:ICAL)?|[Ff]atal|FATAL|[Ss]evere|SEVERE|EMERG(?:ENCY)?|[Ee]merg(?:ency)?)",
    },
];

/// The default table as `(name, expression)` pairs.
pub fn default_patterns() -> impl Iterator<Item = (&'static str, &'static str)> {
    DEFAULT_PATTERNS
        .iter()
        .map(|entry| (entry.name, entry.pattern))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique() {
        let mut seen = HashSet::new();
        for entry in DEFAULT_PATTERNS {
            assert!(seen.insert(entry.name), "duplicate entry {}", entry.name);
        }
    }

    #[test]
    fn references_stay_inside_the_table() {
        let names: HashSet<&str> = DEFAULT_PATTERNS.iter().map(|e| e.name).collect();
        for entry in DEFAULT_PATTERNS {
            for reference in crate::syntax::references(entry.pattern).unwrap() {
                assert!(
                    names.contains(reference),
                    "{} references unknown {reference}",
                    entry.name
                );
            }
        }
    }
}
