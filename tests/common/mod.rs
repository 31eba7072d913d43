//! Frame construction shared by the integration tests

#![allow(dead_code)]

use std::net::Ipv4Addr;
use tcpgate::protocol::ethernet::FrameBuilder;
use tcpgate::protocol::ip_protocol;
use tcpgate::protocol::ipv4::Ipv4Builder;
use tcpgate::protocol::tcp::TcpBuilder;
use tcpgate::protocol::MacAddr;

pub const ETHERTYPE_IPV4: u16 = 0x0800;

pub fn ethernet(ethertype: u16, payload: &[u8]) -> Vec<u8> {
    FrameBuilder::new()
        .dst_mac(MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]))
        .src_mac(MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0x02]))
        .ethertype(ethertype)
        .payload(payload)
        .build()
}

pub fn tcp_frame_with(ip: Ipv4Builder, tcp: TcpBuilder) -> Vec<u8> {
    let segment = tcp.build();
    let packet = ip.protocol(ip_protocol::TCP).payload(&segment).build();
    ethernet(ETHERTYPE_IPV4, &packet)
}

pub fn tcp_frame(src: Ipv4Addr, dst: Ipv4Addr, sport: u16, dport: u16, payload: &[u8]) -> Vec<u8> {
    tcp_frame_with(
        Ipv4Builder::new().src_addr(src).dst_addr(dst),
        TcpBuilder::new().src_port(sport).dst_port(dport).payload(payload),
    )
}
