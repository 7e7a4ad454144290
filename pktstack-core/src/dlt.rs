//! pcap datalink types
//!
//! Captured frames carry a pcap-assigned datalink type (DLT) code that names
//! the outermost framing. This module holds the code table and translates in
//! both directions between codes and the conventional lowercase names.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Datalink type of a captured frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkType {
    /// BSD loopback (DLT_NULL, 0)
    Null,
    /// Ethernet II (DLT_EN10MB, 1)
    En10mb,
    /// Experimental 3Mb Ethernet (2)
    En3mb,
    /// AX.25 amateur radio (3)
    Ax25,
    /// Proteon ProNET Token Ring (4)
    Pronet,
    /// Chaosnet (5)
    Chaos,
    /// IEEE 802.5 Token Ring (6)
    Ieee802,
    /// ARCNET (7)
    Arcnet,
    /// SLIP (8)
    Slip,
    /// PPP (9)
    Ppp,
    /// FDDI (10)
    Fddi,
    /// RFC 1483 LLC-encapsulated ATM (11)
    AtmRfc1483,
    /// Raw IP, no link header (12)
    Raw,
    /// BSD/OS SLIP (15)
    SlipBsdos,
    /// BSD/OS PPP (16)
    PppBsdos,
    /// OpenBSD pfsync (18)
    Pfsync,
    /// Linux Classical IP over ATM (19)
    AtmClip,
    /// PPP in HDLC-like framing (50)
    PppSerial,
    /// Cisco HDLC (104)
    CHdlc,
    /// IEEE 802.11 wireless (105)
    Ieee80211,
    /// OpenBSD loopback (108)
    Loop,
    /// Linux cooked capture v1 (113)
    LinuxSll,
    /// OpenBSD pflog (117)
    Pflog,
    /// 802.11 with radiotap header (127)
    Ieee80211Radio,
    /// Apple IP over IEEE 1394 (138)
    AppleIpOverIeee1394,
    /// 802.11 with AVS header (163)
    Ieee80211RadioAvs,
}

impl LinkType {
    /// Convert LinkType to its pcap DLT code
    pub fn to_u32(self) -> u32 {
        match self {
            LinkType::Null => 0,
            LinkType::En10mb => 1,
            LinkType::En3mb => 2,
            LinkType::Ax25 => 3,
            LinkType::Pronet => 4,
            LinkType::Chaos => 5,
            LinkType::Ieee802 => 6,
            LinkType::Arcnet => 7,
            LinkType::Slip => 8,
            LinkType::Ppp => 9,
            LinkType::Fddi => 10,
            LinkType::AtmRfc1483 => 11,
            LinkType::Raw => 12,
            LinkType::SlipBsdos => 15,
            LinkType::PppBsdos => 16,
            LinkType::Pfsync => 18,
            LinkType::AtmClip => 19,
            LinkType::PppSerial => 50,
            LinkType::CHdlc => 104,
            LinkType::Ieee80211 => 105,
            LinkType::Loop => 108,
            LinkType::LinuxSll => 113,
            LinkType::Pflog => 117,
            LinkType::Ieee80211Radio => 127,
            LinkType::AppleIpOverIeee1394 => 138,
            LinkType::Ieee80211RadioAvs => 163,
        }
    }

    /// Create LinkType from a pcap DLT code
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            0 => Some(LinkType::Null),
            1 => Some(LinkType::En10mb),
            2 => Some(LinkType::En3mb),
            3 => Some(LinkType::Ax25),
            4 => Some(LinkType::Pronet),
            5 => Some(LinkType::Chaos),
            6 => Some(LinkType::Ieee802),
            7 => Some(LinkType::Arcnet),
            8 => Some(LinkType::Slip),
            9 => Some(LinkType::Ppp),
            10 => Some(LinkType::Fddi),
            11 => Some(LinkType::AtmRfc1483),
            12 => Some(LinkType::Raw),
            15 => Some(LinkType::SlipBsdos),
            16 => Some(LinkType::PppBsdos),
            18 => Some(LinkType::Pfsync),
            19 => Some(LinkType::AtmClip),
            50 => Some(LinkType::PppSerial),
            104 => Some(LinkType::CHdlc),
            105 => Some(LinkType::Ieee80211),
            108 => Some(LinkType::Loop),
            113 => Some(LinkType::LinuxSll),
            117 => Some(LinkType::Pflog),
            127 => Some(LinkType::Ieee80211Radio),
            138 => Some(LinkType::AppleIpOverIeee1394),
            163 => Some(LinkType::Ieee80211RadioAvs),
            _ => None,
        }
    }

    /// The conventional lowercase name for this datalink type
    pub fn name(self) -> &'static str {
        match self {
            LinkType::Null => "null",
            LinkType::En10mb => "en10mb",
            LinkType::En3mb => "en3mb",
            LinkType::Ax25 => "ax25",
            LinkType::Pronet => "pronet",
            LinkType::Chaos => "chaos",
            LinkType::Ieee802 => "ieee802",
            LinkType::Arcnet => "arcnet",
            LinkType::Slip => "slip",
            LinkType::Ppp => "ppp",
            LinkType::Fddi => "fddi",
            LinkType::AtmRfc1483 => "atm_rfc1483",
            LinkType::Raw => "raw",
            LinkType::SlipBsdos => "slip_bsdos",
            LinkType::PppBsdos => "ppp_bsdos",
            LinkType::Pfsync => "pfsync",
            LinkType::AtmClip => "atm_clip",
            LinkType::PppSerial => "ppp_serial",
            LinkType::CHdlc => "c_hdlc",
            LinkType::Ieee80211 => "ieee802_11",
            LinkType::Loop => "loop",
            LinkType::LinuxSll => "linux_sll",
            LinkType::Pflog => "pflog",
            LinkType::Ieee80211Radio => "ieee802_11_radio",
            LinkType::AppleIpOverIeee1394 => "apple_ip_over_ieee1394",
            LinkType::Ieee80211RadioAvs => "ieee802_11_radio_avs",
        }
    }

    /// Look up a LinkType by name
    ///
    /// Accepts the `chdlc` spelling next to `c_hdlc`, and the legacy
    /// `ieee802_22_radio_avs` alias some captures carry for the AVS header.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(LinkType::Null),
            "en10mb" => Some(LinkType::En10mb),
            "en3mb" => Some(LinkType::En3mb),
            "ax25" => Some(LinkType::Ax25),
            "pronet" => Some(LinkType::Pronet),
            "chaos" => Some(LinkType::Chaos),
            "ieee802" => Some(LinkType::Ieee802),
            "arcnet" => Some(LinkType::Arcnet),
            "slip" => Some(LinkType::Slip),
            "ppp" => Some(LinkType::Ppp),
            "fddi" => Some(LinkType::Fddi),
            "atm_rfc1483" => Some(LinkType::AtmRfc1483),
            "raw" => Some(LinkType::Raw),
            "slip_bsdos" => Some(LinkType::SlipBsdos),
            "ppp_bsdos" => Some(LinkType::PppBsdos),
            "pfsync" => Some(LinkType::Pfsync),
            "atm_clip" => Some(LinkType::AtmClip),
            "ppp_serial" => Some(LinkType::PppSerial),
            "c_hdlc" | "chdlc" => Some(LinkType::CHdlc),
            "ieee802_11" => Some(LinkType::Ieee80211),
            "loop" => Some(LinkType::Loop),
            "linux_sll" => Some(LinkType::LinuxSll),
            "pflog" => Some(LinkType::Pflog),
            "ieee802_11_radio" => Some(LinkType::Ieee80211Radio),
            "apple_ip_over_ieee1394" => Some(LinkType::AppleIpOverIeee1394),
            "ieee802_11_radio_avs" | "ieee802_22_radio_avs" => Some(LinkType::Ieee80211RadioAvs),
            _ => None,
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LinkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LinkType::from_name(s).ok_or_else(|| Error::UnknownLinkType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [0, 1, 12, 104, 105, 108, 113, 117, 127, 138, 163] {
            let lt = LinkType::from_u32(code).unwrap();
            assert_eq!(lt.to_u32(), code);
        }
        assert!(LinkType::from_u32(200).is_none());
    }

    #[test]
    fn test_name_roundtrip() {
        for code in [0u32, 1, 8, 18, 50, 113, 163] {
            let lt = LinkType::from_u32(code).unwrap();
            assert_eq!(LinkType::from_name(lt.name()), Some(lt));
        }
    }

    #[test]
    fn test_chdlc_aliases() {
        assert_eq!(LinkType::from_name("c_hdlc"), Some(LinkType::CHdlc));
        assert_eq!(LinkType::from_name("chdlc"), Some(LinkType::CHdlc));
        assert_eq!(LinkType::CHdlc.to_u32(), 104);
        assert_eq!(LinkType::CHdlc.name(), "c_hdlc");
    }

    #[test]
    fn test_avs_legacy_alias() {
        assert_eq!(
            LinkType::from_name("ieee802_22_radio_avs"),
            Some(LinkType::Ieee80211RadioAvs)
        );
        assert_eq!(
            LinkType::Ieee80211RadioAvs.name(),
            "ieee802_11_radio_avs"
        );
    }

    #[test]
    fn test_from_str() {
        let lt: LinkType = "en10mb".parse().unwrap();
        assert_eq!(lt, LinkType::En10mb);
        assert!("token_ring_9000".parse::<LinkType>().is_err());
        assert_eq!(format!("{}", LinkType::LinuxSll), "linux_sll");
    }
}
