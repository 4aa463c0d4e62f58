use super::wire::{build_response, fqdn, WireAnswer};
use hickory_proto::op::Message;
use hickory_proto::rr::RecordType;
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

const RCODE_NOERROR: u8 = 0;
const RCODE_NXDOMAIN: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Answer every question from the record table.
    Respond,
    /// Accept and read queries but never answer.
    Silent,
    /// Answer, then close the connection.
    CloseAfterResponse,
    /// Answer every question with a single A record.
    WrongRecordType,
    /// Answer with a message ID that does not match the query.
    WrongId,
    /// Answer with a correctly framed but truncated DNS message.
    Garbage,
}

#[derive(Default)]
struct Records {
    srv: HashMap<String, Vec<(String, u16)>>,
    a: HashMap<String, Vec<Ipv4Addr>>,
}

struct ServerState {
    records: Mutex<Records>,
    behavior: Mutex<Behavior>,
    delay: Mutex<Duration>,
    connections: AtomicUsize,
    queries: AtomicUsize,
    connection_tasks: Mutex<Vec<JoinHandle<()>>>,
}

/// A TCP directory speaking length-prefixed DNS for SRV and A questions.
pub struct MockDirectoryServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    accept_task: Option<JoinHandle<()>>,
}

impl MockDirectoryServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let state = Arc::new(ServerState {
            records: Mutex::new(Records::default()),
            behavior: Mutex::new(Behavior::Respond),
            delay: Mutex::new(Duration::ZERO),
            connections: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
            connection_tasks: Mutex::new(Vec::new()),
        });

        let accept_state = Arc::clone(&state);
        let accept_task = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                accept_state.connections.fetch_add(1, Ordering::SeqCst);

                let conn_state = Arc::clone(&accept_state);
                let handle = tokio::spawn(serve_connection(stream, conn_state));
                accept_state.connection_tasks.lock().unwrap().push(handle);
            }
        });

        Self {
            addr,
            state,
            accept_task: Some(accept_task),
        }
    }

    pub fn addr(&self) -> String {
        self.addr.to_string()
    }

    pub fn add_srv(&self, name: &str, target: &str, port: u16) {
        self.state
            .records
            .lock()
            .unwrap()
            .srv
            .entry(fqdn(name))
            .or_default()
            .push((fqdn(target), port));
    }

    pub fn add_a(&self, host: &str, ip: Ipv4Addr) {
        self.state
            .records
            .lock()
            .unwrap()
            .a
            .entry(fqdn(host))
            .or_default()
            .push(ip);
    }

    pub fn remove_a(&self, host: &str) {
        self.state.records.lock().unwrap().a.remove(&fqdn(host));
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.state.behavior.lock().unwrap() = behavior;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = delay;
    }

    /// TCP connections accepted so far.
    pub fn connections(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }

    /// Wait until at least `n` connections were accepted and return the count.
    ///
    /// A client's connect completes in the kernel before the accept loop
    /// runs, so the counter can lag behind a successful dial.
    pub async fn wait_for_connections(&self, n: usize) -> usize {
        let waited = tokio::time::timeout(Duration::from_secs(2), async {
            while self.connections() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(
            waited.is_ok(),
            "expected {} accepted connections, saw {}",
            n,
            self.connections()
        );
        self.connections()
    }

    /// Queries read so far, answered or not.
    pub fn queries(&self) -> usize {
        self.state.queries.load(Ordering::SeqCst)
    }

    /// Close the listening socket. Established connections keep being served.
    pub async fn stop_accepting(&mut self) {
        if let Some(task) = self.accept_task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for MockDirectoryServer {
    fn drop(&mut self) {
        if let Some(task) = self.accept_task.take() {
            task.abort();
        }
        for task in self.state.connection_tasks.lock().unwrap().drain(..) {
            task.abort();
        }
    }
}

async fn serve_connection(mut stream: TcpStream, state: Arc<ServerState>) {
    loop {
        let mut len_buf = [0u8; 2];
        if stream.read_exact(&mut len_buf).await.is_err() {
            return;
        }
        let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
        if stream.read_exact(&mut query).await.is_err() {
            return;
        }
        state.queries.fetch_add(1, Ordering::SeqCst);

        let behavior = *state.behavior.lock().unwrap();
        if behavior == Behavior::Silent {
            continue;
        }

        let delay = *state.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let response = answer(&query, behavior, &state);
        let mut framed = Vec::with_capacity(response.len() + 2);
        framed.extend_from_slice(&(response.len() as u16).to_be_bytes());
        framed.extend_from_slice(&response);

        if stream.write_all(&framed).await.is_err() {
            return;
        }

        if behavior == Behavior::CloseAfterResponse {
            return;
        }
    }
}

fn answer(query: &[u8], behavior: Behavior, state: &ServerState) -> Vec<u8> {
    let id = u16::from_be_bytes([query[0], query[1]]);
    let message = Message::from_vec(query).unwrap();
    let question = &message.queries()[0];
    let name = fqdn(&question.name().to_utf8());

    let answers: Vec<WireAnswer> = if behavior == Behavior::WrongRecordType {
        vec![WireAnswer::A(Ipv4Addr::new(192, 0, 2, 1))]
    } else {
        let records = state.records.lock().unwrap();
        match question.query_type() {
            RecordType::SRV => records
                .srv
                .get(&name)
                .map(|targets| {
                    targets
                        .iter()
                        .map(|(target, port)| WireAnswer::srv(target, *port))
                        .collect()
                })
                .unwrap_or_default(),
            RecordType::A => records
                .a
                .get(&name)
                .map(|ips| ips.iter().copied().map(WireAnswer::A).collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    };

    let id = if behavior == Behavior::WrongId {
        id.wrapping_add(1)
    } else {
        id
    };
    let rcode = if answers.is_empty() {
        RCODE_NXDOMAIN
    } else {
        RCODE_NOERROR
    };

    let mut response = build_response(query, id, rcode, &answers);
    if behavior == Behavior::Garbage {
        // Header claims one question, body stops mid-name.
        response.truncate(14);
    }
    response
}
