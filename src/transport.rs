pub(crate) mod udp;
