// End-to-end tests: a real server on 127.0.0.1 talking to a minimal client.
use crate::config::Config;
use crate::core_network::network::serve;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

const ANSWER: &[u8] = b"The answer is 42.\n";
const AUTHORS: &[u8] = b"Ada\nGrace\r\nLinus\n";

fn image_bytes() -> Vec<u8> {
    let mut bytes = b"\xff\xd8\xff\xe0\r\n\n\r".to_vec();
    bytes.extend((0..=255u8).cycle().take(70_000));
    bytes
}

fn fixture() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("test/data/images")).unwrap();
    fs::write(root.join("test/data/answer.txt"), ANSWER).unwrap();
    fs::write(root.join("test/data/authors.txt"), AUTHORS).unwrap();
    fs::write(root.join("test/data/images/guin.jpg"), image_bytes()).unwrap();
    (dir, root)
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.server.data_timeout_secs = 5;
    config.server.reject_current_dir = true;
    config.auth.username = "cs317".to_string();
    config.auth.password_hash = None;
    config
}

async fn start(config: Config) -> (TempDir, SocketAddr) {
    let (dir, root) = fixture();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, Arc::new(config), root));
    (dir, addr)
}

struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> (Client, String) {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, write_half) = stream.into_split();
        let mut client = Client {
            reader: BufReader::new(read_half),
            writer: write_half,
        };
        let greeting = client.reply().await;
        (client, greeting)
    }

    async fn login(addr: SocketAddr) -> Client {
        let (mut client, greeting) = Client::connect(addr).await;
        assert!(greeting.starts_with("220 "), "{}", greeting);
        assert_code(&client.cmd("USER cs317").await, "331");
        assert_code(&client.cmd("PASS secret").await, "230");
        client
    }

    /// Reads one reply, skipping `NNN-` continuation lines. Returns the final line.
    async fn reply(&mut self) -> String {
        loop {
            let mut line = String::new();
            let n = timeout(Duration::from_secs(10), self.reader.read_line(&mut line))
                .await
                .expect("reply timed out")
                .unwrap();
            assert!(n > 0, "connection closed while waiting for a reply");
            let bytes = line.as_bytes();
            if bytes.len() >= 4 && bytes[..3].iter().all(u8::is_ascii_digit) && bytes[3] == b' ' {
                return line;
            }
        }
    }

    async fn cmd(&mut self, line: &str) -> String {
        self.writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .unwrap();
        self.reply().await
    }

    async fn pasv(&mut self) -> TcpStream {
        let reply = self.cmd("PASV").await;
        assert_code(&reply, "227");
        let open = reply.find('(').unwrap();
        let close = reply.find(')').unwrap();
        let numbers: Vec<u16> = reply[open + 1..close]
            .split(',')
            .map(|n| n.parse().unwrap())
            .collect();
        let ip = format!("{}.{}.{}.{}", numbers[0], numbers[1], numbers[2], numbers[3]);
        let port = numbers[4] * 256 + numbers[5];
        TcpStream::connect((ip.as_str(), port)).await.unwrap()
    }

    /// PASV, then `command`; returns the preliminary reply, the data and the final reply.
    async fn transfer(&mut self, command: &str) -> (String, Vec<u8>, String) {
        let mut data = self.pasv().await;
        let preliminary = self.cmd(command).await;
        assert_code(&preliminary, "150");
        let mut received = Vec::new();
        data.read_to_end(&mut received).await.unwrap();
        let done = self.reply().await;
        (preliminary, received, done)
    }

    async fn nlst(&mut self, arg: &str) -> String {
        let command = if arg.is_empty() {
            "NLST".to_string()
        } else {
            format!("NLST {}", arg)
        };
        let (_, body, done) = self.transfer(&command).await;
        assert_code(&done, "226");
        String::from_utf8(body).unwrap()
    }

    async fn retr(&mut self, path: &str) -> Vec<u8> {
        let (_, body, done) = self.transfer(&format!("RETR {}", path)).await;
        assert_code(&done, "226");
        body
    }
}

fn assert_code(reply: &str, code: &str) {
    assert!(reply.starts_with(code), "expected {}, got {:?}", code, reply);
}

#[tokio::test]
async fn test_commands_before_login_are_rejected() {
    let (_dir, addr) = start(test_config()).await;
    let (mut client, _) = Client::connect(addr).await;

    for command in ["NLST", "CWD test", "CDUP", "RETR test/data/answer.txt", "PASV", "PWD"] {
        assert_code(&client.cmd(command).await, "530");
    }
    assert_code(&client.cmd("PASS early").await, "503");

    assert_code(&client.cmd("USER cs317").await, "331");
    assert_code(&client.cmd("PASS secret").await, "230");
    assert_code(&client.cmd("PWD").await, "257");
}

#[tokio::test]
async fn test_failed_login_then_retry() {
    let (_dir, addr) = start(test_config()).await;
    let (mut client, _) = Client::connect(addr).await;

    assert_code(&client.cmd("USER nobody").await, "331");
    assert_code(&client.cmd("PASS wrong").await, "530");
    assert_code(&client.cmd("NLST").await, "530");

    assert_code(&client.cmd("USER cs317").await, "331");
    assert_code(&client.cmd("PASS").await, "230");
    assert_code(&client.cmd("USER other").await, "530");
}

#[tokio::test]
async fn test_anonymous_login_shares_the_root() {
    let (_dir, addr) = start(test_config()).await;
    let (mut client, _) = Client::connect(addr).await;

    assert_code(&client.cmd("USER anonymous").await, "331");
    assert_code(&client.cmd("PASS guest@example.com").await, "230");
    assert_eq!(client.nlst("").await, "test\r\n");
}

#[tokio::test]
async fn test_root_listing_is_stable() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    let before = client.nlst("").await;
    assert_eq!(before, "test\r\n");
    assert_code(&client.cmd("CWD /").await, "250");
    assert_eq!(client.nlst("").await, before);
    assert_eq!(client.nlst("/").await, before);
}

#[tokio::test]
async fn test_nlst_of_subdirectory() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    assert_eq!(
        client.nlst("test/data").await,
        "answer.txt\r\nauthors.txt\r\nimages\r\n"
    );
    assert_code(&client.cmd("CWD test/data").await, "250");
    assert_eq!(client.nlst("").await, "answer.txt\r\nauthors.txt\r\nimages\r\n");
}

#[tokio::test]
async fn test_cannot_leave_the_root() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    for target in ["..", "/..", "../test", "test/../../", "/../../etc"] {
        assert_code(&client.cmd(&format!("CWD {}", target)).await, "550");
        assert_eq!(client.cmd("PWD").await, "257 \"/\" is the current directory.\r\n");
    }
    assert_code(&client.cmd("CDUP").await, "550");

    let _data = client.pasv().await;
    assert_code(&client.cmd("RETR ../../etc/passwd").await, "550");
    assert_code(&client.cmd("RETR test/data/answer.txt").await, "425");
}

#[tokio::test]
async fn test_cdup_walks_back_to_root_and_stops() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    assert_code(&client.cmd("CWD test/data").await, "250");
    assert_eq!(
        client.cmd("PWD").await,
        "257 \"/test/data\" is the current directory.\r\n"
    );
    assert_code(&client.cmd("CDUP").await, "250");
    assert_code(&client.cmd("XCUP").await, "250");
    assert_code(&client.cmd("CDUP").await, "550");
    assert_eq!(client.cmd("PWD").await, "257 \"/\" is the current directory.\r\n");
}

#[tokio::test]
async fn test_cwd_into_current_directory_is_refused() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    assert_code(&client.cmd("CWD test").await, "250");
    assert_code(&client.cmd("CWD /test").await, "550");
    assert_code(&client.cmd("CWD .").await, "550");
    assert_code(&client.cmd("CWD data/images/../..").await, "550");
    assert_eq!(
        client.cmd("PWD").await,
        "257 \"/test\" is the current directory.\r\n"
    );
}

#[tokio::test]
async fn test_cwd_failures_keep_working_directory() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    assert_code(&client.cmd("CWD test").await, "250");
    for target in ["missing", "data/answer.txt", "../.."] {
        assert_code(&client.cmd(&format!("CWD {}", target)).await, "550");
    }
    assert_code(&client.cmd("CWD").await, "501");
    assert_eq!(
        client.cmd("PWD").await,
        "257 \"/test\" is the current directory.\r\n"
    );
}

#[tokio::test]
async fn test_binary_retr_is_byte_identical() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    assert_code(&client.cmd("TYPE I").await, "200");
    assert_eq!(client.retr("test/data/answer.txt").await, ANSWER);
    assert_eq!(client.retr("test/data/authors.txt").await, AUTHORS);
    assert_eq!(client.retr("/test/data/images/guin.jpg").await, image_bytes());

    assert_code(&client.cmd("CWD test/data/images").await, "250");
    assert_eq!(client.retr("guin.jpg").await, image_bytes());
}

#[tokio::test]
async fn test_ascii_retr_uses_crlf() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    let (preliminary, body, done) = client.transfer("RETR test/data/authors.txt").await;
    assert!(preliminary.contains("ASCII"), "{}", preliminary);
    assert_eq!(body, b"Ada\r\nGrace\r\nLinus\r\n");
    assert_code(&done, "226");

    assert_code(&client.cmd("TYPE A").await, "200");
    assert_eq!(client.retr("test/data/answer.txt").await, b"The answer is 42.\r\n");
}

#[tokio::test]
async fn test_dot_segments_inside_root_are_accepted() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    assert_code(&client.cmd("TYPE I").await, "200");
    assert_eq!(client.retr("test/data/./answer.txt").await, ANSWER);
    assert_eq!(client.retr("test/data/images/../answer.txt").await, ANSWER);
}

#[tokio::test]
async fn test_retr_errors() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    assert_code(&client.cmd("RETR test/data/answer.txt").await, "425");
    assert_code(&client.cmd("RETR").await, "501");

    let _data = client.pasv().await;
    assert_code(&client.cmd("RETR test/data/missing.txt").await, "550");
    // The failed RETR used up the channel.
    assert_code(&client.cmd("RETR test/data/answer.txt").await, "425");

    let _data = client.pasv().await;
    assert_code(&client.cmd("RETR test/data").await, "550");
}

#[tokio::test]
async fn test_list_shows_long_format() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    let (_, body, done) = client.transfer("LIST -l test/data").await;
    assert_code(&done, "226");
    let body = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("-rw-r--r--") && lines[0].ends_with(" answer.txt"));
    assert!(lines[0].contains(&format!(" {} ", ANSWER.len())));
    assert!(lines[2].starts_with("drwxr-xr-x") && lines[2].ends_with(" images"));
}

#[tokio::test]
async fn test_active_mode_transfer() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    let data_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = data_listener.local_addr().unwrap().port();
    let reply = client
        .cmd(&format!("PORT 127,0,0,1,{},{}", port >> 8, port & 0xff))
        .await;
    assert_code(&reply, "200");

    assert_code(&client.cmd("NLST").await, "150");
    let (mut data, _) = data_listener.accept().await.unwrap();
    let mut received = Vec::new();
    data.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, b"test\r\n");
    assert_code(&client.reply().await, "226");

    assert_code(&client.cmd("PORT 10,1,2,3,4,5").await, "500");
    assert_code(&client.cmd("PORT 1,2,3").await, "501");
}

#[tokio::test]
async fn test_unknown_command_keeps_session() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    assert_code(&client.cmd("FROB something").await, "502");
    assert_code(&client.cmd("STOR upload.txt").await, "502");
    assert_code(&client.cmd("NOOP").await, "200");
    assert_code(&client.cmd("SYST").await, "215");
    assert_code(&client.cmd("TYPE E").await, "504");
    assert_code(&client.cmd("MODE S").await, "200");
    assert_code(&client.cmd("MODE B").await, "504");
    assert_code(&client.cmd("STRU F").await, "200");
}

#[tokio::test]
async fn test_quit_closes_connection() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    assert_eq!(client.cmd("QUIT").await, "221 Goodbye.\r\n");
    let mut rest = String::new();
    let n = client.reader.read_line(&mut rest).await.unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let (_dir, addr) = start(test_config()).await;
    let mut first = Client::login(addr).await;
    let mut second = Client::login(addr).await;

    assert_code(&first.cmd("CWD test/data").await, "250");
    assert_code(&first.cmd("TYPE I").await, "200");

    assert_eq!(second.cmd("PWD").await, "257 \"/\" is the current directory.\r\n");
    assert_eq!(
        second.retr("test/data/authors.txt").await,
        b"Ada\r\nGrace\r\nLinus\r\n"
    );
    assert_eq!(first.retr("authors.txt").await, AUTHORS);
}

#[tokio::test]
async fn test_client_limit() {
    let mut config = test_config();
    config.server.max_clients = 1;
    let (_dir, addr) = start(config).await;

    let (mut first, _) = Client::connect(addr).await;
    let (_second, greeting) = Client::connect(addr).await;
    assert_code(&greeting, "421");
    assert_code(&first.cmd("NOOP").await, "530");
}

#[tokio::test]
async fn test_idle_timeout() {
    let mut config = test_config();
    config.server.idle_timeout_secs = 1;
    let (_dir, addr) = start(config).await;

    let (mut client, _) = Client::connect(addr).await;
    assert_eq!(client.reply().await, "421 Timeout.\r\n");
}

#[tokio::test]
async fn test_multi_line_banner() {
    let mut config = test_config();
    config.server.banner = "Welcome\nRead only".to_string();
    let (_dir, addr) = start(config).await;

    let (_client, greeting) = Client::connect(addr).await;
    assert_eq!(greeting, "220 Read only\r\n");
}

#[tokio::test]
async fn test_ascii_retr_from_working_directory() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    assert_code(&client.cmd("CWD test/data").await, "250");
    assert_code(&client.cmd("TYPE A").await, "200");
    let body = client.retr("answer.txt").await;
    let text = String::from_utf8(body).unwrap().replace("\r\n", "\n");
    assert_eq!(text.as_bytes(), ANSWER);

    let _data = client.pasv().await;
    assert_code(&client.cmd("RETR nope.txt").await, "550");
    assert_eq!(
        client.cmd("PWD").await,
        "257 \"/test/data\" is the current directory.\r\n"
    );
}

#[tokio::test]
async fn test_oversized_command_line_is_refused() {
    let (_dir, addr) = start(test_config()).await;
    let mut client = Client::login(addr).await;

    let flood = "A".repeat(crate::constants::MAX_COMMAND_LINE * 256);
    let reply = client.cmd(&flood).await;
    assert_eq!(reply, "500 Command line too long.\r\n");

    let reply = client.cmd(&format!("FROB{}", "X".repeat(500))).await;
    assert_code(&reply, "502");
    assert!(reply.len() < 64, "{:?}", reply);

    assert_code(&client.cmd("NOOP").await, "200");
}
