use std::net::Ipv4Addr;

const TYPE_A: u16 = 1;
const TYPE_SRV: u16 = 33;
const CLASS_IN: u16 = 1;

/// An answer record whose owner is the question name (pointer to offset 12).
#[derive(Debug, Clone)]
pub enum WireAnswer {
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    A(Ipv4Addr),
}

impl WireAnswer {
    pub fn srv(target: &str, port: u16) -> Self {
        WireAnswer::Srv {
            priority: 1,
            weight: 1,
            port,
            target: fqdn(target),
        }
    }
}

/// Lowercase, dot-terminated form used as lookup key.
pub fn fqdn(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with('.') {
        lower
    } else {
        format!("{}.", lower)
    }
}

/// `7f000001.addr.dc1.consul.` style target for an address.
pub fn embedded_target(ip: Ipv4Addr, datacenter: &str) -> String {
    format!("{:08x}.addr.{}.consul.", u32::from(ip), datacenter)
}

/// Unframed response echoing the question of `query` (an unframed message).
pub fn build_response(query: &[u8], id: u16, rcode: u8, answers: &[WireAnswer]) -> Vec<u8> {
    let mut response = Vec::with_capacity(512);

    response.extend_from_slice(&id.to_be_bytes());
    response.push(0x84);
    response.push(rcode & 0x0f);
    response.extend_from_slice(&[0x00, 0x01]);
    response.extend_from_slice(&(answers.len() as u16).to_be_bytes());
    response.extend_from_slice(&[0x00, 0x00]);
    response.extend_from_slice(&[0x00, 0x00]);

    if query.len() > 12 {
        response.extend_from_slice(&query[12..]);
    }

    for answer in answers {
        response.extend_from_slice(&[0xc0, 0x0c]);
        match answer {
            WireAnswer::Srv {
                priority,
                weight,
                port,
                target,
            } => {
                let name = encode_name(target);
                response.extend_from_slice(&TYPE_SRV.to_be_bytes());
                response.extend_from_slice(&CLASS_IN.to_be_bytes());
                response.extend_from_slice(&0u32.to_be_bytes());
                response.extend_from_slice(&((6 + name.len()) as u16).to_be_bytes());
                response.extend_from_slice(&priority.to_be_bytes());
                response.extend_from_slice(&weight.to_be_bytes());
                response.extend_from_slice(&port.to_be_bytes());
                response.extend_from_slice(&name);
            }
            WireAnswer::A(ip) => {
                response.extend_from_slice(&TYPE_A.to_be_bytes());
                response.extend_from_slice(&CLASS_IN.to_be_bytes());
                response.extend_from_slice(&0u32.to_be_bytes());
                response.extend_from_slice(&4u16.to_be_bytes());
                response.extend_from_slice(&ip.octets());
            }
        }
    }

    response
}

fn encode_name(name: &str) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(name.len() + 2);
    for label in name.trim_end_matches('.').split('.').filter(|l| !l.is_empty()) {
        encoded.push(label.len() as u8);
        encoded.extend_from_slice(label.as_bytes());
    }
    encoded.push(0);
    encoded
}
