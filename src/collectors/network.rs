use super::fields::{parse_u64_or_zero, split_fields};
use super::{Tool, ToolParser};

/// Cumulative byte counters summed over every non-loopback interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkCounters {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// Parses `ip -s link` output.
///
/// Each interface block starts with a header line whose third token is the
/// `<FLAG,FLAG,...>` list. Inside a block, an `RX:` or `TX:` label line is
/// followed by a line whose first token is the byte counter. Blocks whose first
/// flag equals the loopback flag are skipped entirely.
pub struct IpLinkParser<'a> {
    loopback_flag: &'a str,
}

#[derive(Clone, Copy)]
enum Pending {
    Nothing,
    Rx,
    Tx,
}

impl<'a> IpLinkParser<'a> {
    pub fn new(loopback_flag: &'a str) -> Self {
        Self { loopback_flag }
    }
}

impl ToolParser for IpLinkParser<'_> {
    type Output = LinkCounters;

    fn tool(&self) -> Tool {
        Tool::IpLink
    }

    fn parse(&self, text: &str) -> LinkCounters {
        let mut counters = LinkCounters::default();
        let mut in_loopback = false;
        let mut pending = Pending::Nothing;

        for fields in split_fields(text) {
            if let Some(flag) = first_interface_flag(&fields) {
                in_loopback = flag == self.loopback_flag;
                pending = Pending::Nothing;
                continue;
            }
            if in_loopback {
                continue;
            }

            match pending {
                Pending::Rx => {
                    counters.rx_bytes += parse_u64_or_zero(fields.first().copied());
                    pending = Pending::Nothing;
                }
                Pending::Tx => {
                    counters.tx_bytes += parse_u64_or_zero(fields.first().copied());
                    pending = Pending::Nothing;
                }
                Pending::Nothing => match fields.first().copied() {
                    Some("RX:") => pending = Pending::Rx,
                    Some("TX:") => pending = Pending::Tx,
                    _ => {}
                },
            }
        }

        counters
    }
}

/// First flag of an interface header line, e.g. `LOOPBACK` from
/// `1: lo: <LOOPBACK,UP,LOWER_UP> mtu 65536 ...`.
fn first_interface_flag<'t>(fields: &[&'t str]) -> Option<&'t str> {
    let flags = fields.get(2)?.strip_prefix('<')?;
    flags.split([',', '>']).next()
}

pub fn bytes_to_megabits(bytes: u64) -> f64 {
    bytes as f64 * 8.0 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const IP_LINK: &str = "1: lo: <LOOPBACK,UP,LOWER_UP> mtu 65536 qdisc noqueue state UNKNOWN mode DEFAULT group default qlen 1000
    link/loopback 00:00:00:00:00:00 brd 00:00:00:00:00:00
    RX:  bytes packets errors dropped  missed   mcast
       7777777    1200      0       0       0       0
    TX:  bytes packets errors dropped carrier collsns
       8888888    1200      0       0       0       0
2: enp3s0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc fq_codel state UP mode DEFAULT group default qlen 1000
    link/ether 3c:7c:3f:00:11:22 brd ff:ff:ff:ff:ff:ff
    RX:  bytes packets errors dropped  missed   mcast
       1000000    9000      0       4       0     120
    TX:  bytes packets errors dropped carrier collsns
        250000    3000      0       0       0       0
3: wlp4s0: <NO-CARRIER,BROADCAST,MULTICAST,UP> mtu 1500 qdisc noqueue state DOWN mode DORMANT group default qlen 1000
    link/ether 9c:b6:d0:33:44:55 brd ff:ff:ff:ff:ff:ff
    altname wlx9cb6d0334455
    RX:  bytes packets errors dropped  missed   mcast
        500000     400      0       0       0       0
    TX:  bytes packets errors dropped carrier collsns
        125000     300      0       0       0       0
";

    fn parse(text: &str) -> LinkCounters {
        IpLinkParser::new("LOOPBACK").parse(text)
    }

    #[test]
    fn sums_non_loopback_interfaces() {
        let counters = parse(IP_LINK);
        assert_eq!(counters.rx_bytes, 1_500_000);
        assert_eq!(counters.tx_bytes, 375_000);
    }

    #[test]
    fn converts_bytes_to_megabits() {
        let counters = parse(IP_LINK);
        assert_eq!(bytes_to_megabits(counters.rx_bytes), 12.0);
        assert_eq!(bytes_to_megabits(counters.tx_bytes), 3.0);
    }

    #[test]
    fn loopback_only_output_is_zero() {
        let text = IP_LINK.split("2: enp3s0").next().unwrap();
        assert_eq!(parse(text), LinkCounters::default());
    }

    #[test]
    fn loopback_skip_ends_at_next_interface() {
        let text = "1: lo: <LOOPBACK> mtu 65536 qdisc noqueue state DOWN
    RX:  bytes packets
    4000 1
2: eth0: <BROADCAST,UP> mtu 1500
    RX:  bytes packets
    1000 1
";
        assert_eq!(parse(text).rx_bytes, 1000);
    }

    #[test]
    fn loopback_flag_elsewhere_in_list_is_counted() {
        let text = "4: odd0: <BROADCAST,LOOPBACK,UP> mtu 1500
    RX:  bytes packets
    1000 1
";
        assert_eq!(parse(text).rx_bytes, 1000);
    }

    #[test]
    fn garbled_counters_count_as_zero() {
        let text = "2: eth0: <BROADCAST,UP> mtu 1500
    RX:  bytes packets
    n/a 1
    TX:  bytes packets
";
        assert_eq!(parse(text), LinkCounters::default());
    }

    #[test]
    fn empty_output_is_zero() {
        assert_eq!(parse(""), LinkCounters::default());
    }
}
