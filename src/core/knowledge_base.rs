//! Static, read-only advisory data for well-known service ports.
//!
//! This table only answers "is there anything to say about this port, and
//! what". Severity tiers live in `core::risk` and are derived independently,
//! so a port can carry an advisory without being flagged into a tier.

/// A human-readable advisory attached to a well-known port.
pub struct PortAdvisory {
    /// The port identifier, as it appears in scan results (e.g. "445").
    pub port: &'static str,
    /// The advisory sentence shown in the vulnerability matrix.
    pub advisory: &'static str,
}

/// The centralized advisory table.
static ADVISORIES: &[PortAdvisory] = &[
    // --- Plain-text and legacy protocols ---
    PortAdvisory { port: "21", advisory: "CRITICAL: FTP transmits credentials in plain text. Highly insecure." },
    PortAdvisory { port: "22", advisory: "WARNING: SSH is secure but a primary target for automated brute-force attacks." },
    PortAdvisory { port: "23", advisory: "CRITICAL: Telnet is unencrypted and highly vulnerable to sniffing." },
    PortAdvisory { port: "25", advisory: "INFO: SMTP used for email routing. Can be prone to relay abuse." },
    PortAdvisory { port: "53", advisory: "INFO: DNS service. Essential for name resolution." },
    PortAdvisory { port: "80", advisory: "INFO: Standard unencrypted HTTP web traffic." },
    PortAdvisory { port: "110", advisory: "WARNING: POP3 email retrieval. Often unencrypted." },
    PortAdvisory { port: "111", advisory: "INFO: RPCBind service. Common in Unix/Linux environments." },
    PortAdvisory { port: "135", advisory: "INFO: Microsoft RPC endpoint mapper." },
    PortAdvisory { port: "139", advisory: "CRITICAL: NetBIOS legacy protocol. Used for lateral movement." },
    PortAdvisory { port: "143", advisory: "WARNING: IMAP email retrieval. Check for SSL/TLS." },

    // --- Encrypted transports ---
    PortAdvisory { port: "443", advisory: "SECURE: Encrypted HTTPS traffic. Standard for secure web." },
    PortAdvisory { port: "445", advisory: "CRITICAL: SMB is a high-risk target for ransomware (WannaCry)." },
    PortAdvisory { port: "993", advisory: "SECURE: IMAPS (Encrypted IMAP). Recommended for email." },
    PortAdvisory { port: "995", advisory: "SECURE: POP3S (Encrypted POP3). Recommended for email." },

    // --- Remote access and exposed back-ends ---
    PortAdvisory { port: "1723", advisory: "WARNING: PPTP VPN protocol. Known security weaknesses." },
    PortAdvisory { port: "3306", advisory: "WARNING: Database port exposed. Potential for SQL injection." },
    PortAdvisory { port: "3389", advisory: "WARNING: RDP is a major entry point for unauthorized access." },
    PortAdvisory { port: "5900", advisory: "WARNING: VNC remote desktop. Ensure strong encryption/MFA." },
    PortAdvisory { port: "8080", advisory: "WARNING: Often used for misconfigured internal development tools." },
];

/// Retrieves the advisory for a given port from the static table.
///
/// # Returns
///
/// `None` if the port has no entry.
pub fn get_port_advisory(port: &str) -> Option<&'static PortAdvisory> {
    ADVISORIES.iter().find(|a| a.port == port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_has_one_entry_per_port() {
        let ports: HashSet<_> = ADVISORIES.iter().map(|a| a.port).collect();
        assert_eq!(ports.len(), ADVISORIES.len());
        assert_eq!(ports.len(), 20);
    }

    #[test]
    fn lookup_finds_known_ports_only() {
        assert!(get_port_advisory("445").unwrap().advisory.contains("WannaCry"));
        assert!(get_port_advisory("53").is_some());
        assert!(get_port_advisory("31337").is_none());
        assert!(get_port_advisory("").is_none());
    }
}
