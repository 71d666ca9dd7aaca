use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

const TYPE_A: u16 = 1;
const TYPE_AAAA: u16 = 28;

const RCODE_NOERROR: u8 = 0;
const RCODE_SERVFAIL: u8 = 2;
const RCODE_NXDOMAIN: u8 = 3;

/// How the mock answers each query.
#[derive(Debug, Clone, Copy)]
pub enum MockDnsBehavior {
    /// A record only; AAAA queries get an empty NOERROR.
    Answer(Ipv4Addr),
    /// Empty answer for A, one AAAA record.
    AaaaOnly(Ipv6Addr),
    NxDomain,
    ServFail,
    /// Sets TC over UDP with no answers; the full answer is only served over TCP.
    TruncatedOverUdp(Ipv4Addr),
    /// Like `TruncatedOverUdp`, but the TCP answer carries a different ID.
    MismatchedIdOverTcp(Ipv4Addr),
    /// Never replies.
    Silent,
}

pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    /// Binds UDP and TCP on the same ephemeral loopback port.
    pub async fn start(behavior: MockDnsBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let listener = TcpListener::bind(addr).await?;

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_count = Arc::clone(&udp_queries);
        let tcp_count = Arc::clone(&tcp_queries);

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_count.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = build_response(&buf[..len], behavior, false) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                    accepted = listener.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            tcp_count.fetch_add(1, Ordering::SeqCst);
                            tokio::spawn(async move {
                                let mut len_buf = [0u8; 2];
                                if stream.read_exact(&mut len_buf).await.is_err() {
                                    return;
                                }
                                let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                                if stream.read_exact(&mut query).await.is_err() {
                                    return;
                                }
                                if let Some(response) = build_response(&query, behavior, true) {
                                    let len = (response.len() as u16).to_be_bytes();
                                    let _ = stream.write_all(&len).await;
                                    let _ = stream.write_all(&response).await;
                                }
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn build_response(query: &[u8], behavior: MockDnsBehavior, over_tcp: bool) -> Option<Vec<u8>> {
    if query.len() < 16 {
        return None;
    }
    let question = &query[12..];
    let qtype = u16::from_be_bytes([question[question.len() - 4], question[question.len() - 3]]);

    let mut truncated = false;
    let mut answers: Vec<Vec<u8>> = Vec::new();
    let rcode = match behavior {
        MockDnsBehavior::Silent => return None,
        MockDnsBehavior::NxDomain => RCODE_NXDOMAIN,
        MockDnsBehavior::ServFail => RCODE_SERVFAIL,
        MockDnsBehavior::Answer(ip) => {
            if qtype == TYPE_A {
                answers.push(answer_record(TYPE_A, &ip.octets()));
            }
            RCODE_NOERROR
        }
        MockDnsBehavior::AaaaOnly(ip) => {
            if qtype == TYPE_AAAA {
                answers.push(answer_record(TYPE_AAAA, &ip.octets()));
            }
            RCODE_NOERROR
        }
        MockDnsBehavior::TruncatedOverUdp(ip) | MockDnsBehavior::MismatchedIdOverTcp(ip) => {
            if over_tcp {
                if qtype == TYPE_A {
                    answers.push(answer_record(TYPE_A, &ip.octets()));
                }
            } else {
                truncated = true;
            }
            RCODE_NOERROR
        }
    };

    let mut response = Vec::with_capacity(512);
    response.extend_from_slice(&query[0..2]);
    if over_tcp && matches!(behavior, MockDnsBehavior::MismatchedIdOverTcp(_)) {
        response[0] ^= 0xff;
    }
    // QR | RD, plus TC when truncated
    response.push(if truncated { 0x83 } else { 0x81 });
    // RA | RCODE
    response.push(0x80 | rcode);
    response.extend_from_slice(&[0x00, 0x01]);
    response.extend_from_slice(&(answers.len() as u16).to_be_bytes());
    response.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    response.extend_from_slice(question);
    for answer in answers {
        response.extend_from_slice(&answer);
    }
    Some(response)
}

fn answer_record(rtype: u16, rdata: &[u8]) -> Vec<u8> {
    let mut record = vec![0xc0, 0x0c];
    record.extend_from_slice(&rtype.to_be_bytes());
    record.extend_from_slice(&[0x00, 0x01]);
    record.extend_from_slice(&[0x00, 0x00, 0x00, 0x3c]);
    record.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    record.extend_from_slice(rdata);
    record
}
