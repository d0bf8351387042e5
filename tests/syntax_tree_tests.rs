use jackc::codegen::Instruction;
use jackc::lexer::Lexer;
use jackc::parser::Parser;

#[test]
fn nested_elements_per_production() {
    let input = "class P {
        static int n;
        function int get(int d) {
            var int r;
            let r = (n + d) * -1;
            while (r > 0) { do Out.show(r, \"a\"); }
            return r;
        }
    }";
    assert_eq!(
        jackc::syntax_tree_xml(input).unwrap(),
        "<class>
  <keyword> class </keyword>
  <identifier> P </identifier>
  <symbol> { </symbol>
  <classVarDec>
    <keyword> static </keyword>
    <keyword> int </keyword>
    <identifier> n </identifier>
    <symbol> ; </symbol>
  </classVarDec>
  <subroutineDec>
    <keyword> function </keyword>
    <keyword> int </keyword>
    <identifier> get </identifier>
    <symbol> ( </symbol>
    <parameterList>
      <keyword> int </keyword>
      <identifier> d </identifier>
    </parameterList>
    <symbol> ) </symbol>
    <subroutineBody>
      <symbol> { </symbol>
      <varDec>
        <keyword> var </keyword>
        <keyword> int </keyword>
        <identifier> r </identifier>
        <symbol> ; </symbol>
      </varDec>
      <statements>
        <letStatement>
          <keyword> let </keyword>
          <identifier> r </identifier>
          <symbol> = </symbol>
          <expression>
            <term>
              <symbol> ( </symbol>
              <expression>
                <term>
                  <identifier> n </identifier>
                </term>
                <symbol> + </symbol>
                <term>
                  <identifier> d </identifier>
                </term>
              </expression>
              <symbol> ) </symbol>
            </term>
            <symbol> * </symbol>
            <term>
              <symbol> - </symbol>
              <term>
                <integerConstant> 1 </integerConstant>
              </term>
            </term>
          </expression>
          <symbol> ; </symbol>
        </letStatement>
        <whileStatement>
          <keyword> while </keyword>
          <symbol> ( </symbol>
          <expression>
            <term>
              <identifier> r </identifier>
            </term>
            <symbol> &gt; </symbol>
            <term>
              <integerConstant> 0 </integerConstant>
            </term>
          </expression>
          <symbol> ) </symbol>
          <symbol> { </symbol>
          <statements>
            <doStatement>
              <keyword> do </keyword>
              <identifier> Out </identifier>
              <symbol> . </symbol>
              <identifier> show </identifier>
              <symbol> ( </symbol>
              <expressionList>
                <expression>
                  <term>
                    <identifier> r </identifier>
                  </term>
                </expression>
                <symbol> , </symbol>
                <expression>
                  <term>
                    <stringConstant> a </stringConstant>
                  </term>
                </expression>
              </expressionList>
              <symbol> ) </symbol>
              <symbol> ; </symbol>
            </doStatement>
          </statements>
          <symbol> } </symbol>
        </whileStatement>
        <returnStatement>
          <keyword> return </keyword>
          <expression>
            <term>
              <identifier> r </identifier>
            </term>
          </expression>
          <symbol> ; </symbol>
        </returnStatement>
      </statements>
      <symbol> } </symbol>
    </subroutineBody>
  </subroutineDec>
  <symbol> } </symbol>
</class>
"
    );
}

#[test]
fn empty_lists_and_else_branches() {
    let input = "class E { field Array y; method void f() {
        if (y) { } else { let y[1] = g(); }
        return;
    } }";
    let tree = jackc::syntax_tree_xml(input).unwrap();
    assert!(tree.contains(
        "    <parameterList>
    </parameterList>
"
    ));
    assert!(tree.contains(
        "          <statements>
          </statements>
          <symbol> } </symbol>
          <keyword> else </keyword>
"
    ));
    assert!(tree.contains(
        "                  <identifier> g </identifier>
                  <symbol> ( </symbol>
                  <expressionList>
                  </expressionList>
                  <symbol> ) </symbol>
"
    ));
}

#[test]
fn recording_leaves_code_unchanged() {
    let input = "class A { field int v; method int get() { return v + 1; } }";
    let tokens = Lexer::tokenize(input).unwrap();
    let mut parser = Parser::new(tokens, Vec::<Instruction>::new()).with_syntax_tree();
    parser.parse().unwrap();

    let tree = parser.take_syntax_tree().unwrap().into_xml();
    assert!(tree.starts_with("<class>\n"));
    assert!(parser.take_syntax_tree().is_none());
    assert_eq!(parser.into_emitter(), jackc::compile(input).unwrap());
}

#[test]
fn no_tree_unless_asked() {
    let tokens = Lexer::tokenize("class A { }").unwrap();
    let mut parser = Parser::new(tokens, Vec::<Instruction>::new());
    parser.parse().unwrap();
    assert!(parser.take_syntax_tree().is_none());
}
