#![allow(dead_code)]

use std::net::SocketAddr;
use std::net::TcpStream;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use futures::future::join_all;
use rand::Rng;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;

use celeadm::handle::ClientServiceImpl;
use celeadm::handle::MemCluster;
use celeadm::ServerDescriptor;
use celeadm::ServerId;

/// TestCluster serves an in-memory cluster on local ports, one port per server.
///
/// Servers `1..=members` are the initial members at epoch 1. Servers after them are known to
/// the cluster but are not members. Every server answers with the same cluster state.
pub struct TestCluster {
    pub cluster: MemCluster,
    pub addrs: Vec<String>,
    txs: Vec<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
}

impl TestCluster {
    pub fn new(members: usize, spares: usize) -> Self {
        let addrs = free_addrs(members + spares);

        let mut servers = vec![];
        for (i, a) in addrs.iter().enumerate() {
            servers.push(ServerDescriptor::new(i as ServerId + 1, vec![a.clone()]));
        }

        let cluster = MemCluster::with_members(1, servers[..members].to_vec());
        for s in servers[members..].iter() {
            cluster.state().add_server(s.clone());
        }

        let mut tc = TestCluster {
            cluster,
            addrs,
            txs: vec![],
            join_handle: None,
        };
        tc.start();
        tc
    }

    /// addr returns the address of server `id`.
    pub fn addr(&self, id: ServerId) -> String {
        self.addrs[id as usize - 1].clone()
    }

    pub fn server(&self, id: ServerId) -> ServerDescriptor {
        ServerDescriptor::new(id, vec![self.addr(id)])
    }

    fn start(&mut self) {
        let mut serving = vec![];
        for a in self.addrs.iter() {
            let (tx, rx) = oneshot::channel::<()>();
            let addr: SocketAddr = a.parse().unwrap();
            serving.push((addr, rx));
            self.txs.push(tx);
        }

        // The client side blocks on its own runtime, so servers run on another thread.
        let svc = ClientServiceImpl::of_cluster(&self.cluster);
        let j = thread::spawn(move || {
            let mut rt = Runtime::new().unwrap();
            rt.block_on(async move {
                let mut js = vec![];
                for (addr, rx) in serving {
                    let s = svc.clone();
                    js.push(tokio::spawn(async move {
                        s.serve_with_shutdown(addr, async {
                            rx.await.ok();
                        })
                        .await
                        .unwrap();
                    }));
                }
                for rst in join_all(js).await {
                    rst.unwrap();
                }
            });
        });
        self.join_handle = Some(j);

        for a in self.addrs.iter() {
            wait_for_listening(a);
        }
    }

    pub fn stop(&mut self) {
        while let Some(tx) = self.txs.pop() {
            let _ = tx.send(());
        }
        if let Some(j) = self.join_handle.take() {
            j.join().unwrap();
        }
    }
}

impl Drop for TestCluster {
    fn drop(&mut self) {
        self.stop()
    }
}

/// free_addrs picks `n` local addresses on random ports that nothing listens on.
pub fn free_addrs(n: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    let mut addrs: Vec<String> = vec![];

    while addrs.len() < n {
        let a = format!("127.0.0.1:{}", rng.gen_range(20_000, 60_000));
        if addrs.contains(&a) || TcpStream::connect(&a).is_ok() {
            continue;
        }
        addrs.push(a);
    }
    addrs
}

fn wait_for_listening(addr: &str) {
    for _ in 0..500 {
        if TcpStream::connect(addr).is_ok() {
            return;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("server at {} is not listening", addr);
}
