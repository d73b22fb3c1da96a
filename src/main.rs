fn main() {
    danmaku::game::run();
}
